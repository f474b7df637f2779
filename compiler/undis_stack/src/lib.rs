//! Stack growth for deep recursion.
//!
//! Parse trees recovered from bytecode can be very deep: a folded constant
//! collection with thousands of elements, a long `elif` chain, or a lambda
//! nested inside a comprehension nested inside a function all recurse through
//! the tree builder, the transform, and the generator. Wrap each recursive
//! step in [`ensure_sufficient_stack`] so the native stack grows on demand.
//!
//! ```text
//! fn render(&mut self, node: &Node) -> Result<(), InternalError> {
//!     ensure_sufficient_stack(|| self.render_inner(node))
//! }
//! ```
//!
//! On `wasm32` targets this is a plain call.

/// Grow when less than this much stack remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment (2MB).
const GROW_BY: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if the remaining space is below the red zone.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROW_BY, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
