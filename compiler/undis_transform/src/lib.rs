//! Tree transform.
//!
//! A handful of rewrites that are simpler as tree surgery than as grammar:
//!
//! | rewrite | from | to |
//! |---|---|---|
//! | `assert` | `if` whose body only raises `AssertionError` | `assert` / `assert2` |
//! | `elif` | `else` branch holding a single `if` | `ifelifstmt` + `elif*` |
//! | `preamble` | `__module__ = __name__`, `__qualname__ = '...'` | `class_preamble` |
//! | `docstring` | first `__doc__ = '...'` of a body | `docstring` |
//!
//! Rewrites run bottom-up, once, after a successful parse. They relabel and
//! regroup existing nodes only: every token in the output was in the input.
//! A tree none of them match comes back unchanged.

mod assert;
mod body;
mod elif;

use undis_ir::{Child, Node};
use undis_stack::ensure_sufficient_stack;

/// One rewrite, offered every node bottom-up.
struct Rewrite {
    name: &'static str,
    apply: fn(&mut Node) -> bool,
}

const REWRITES: &[Rewrite] = &[
    Rewrite {
        name: "assert",
        apply: assert::fold_assert,
    },
    Rewrite {
        name: "elif",
        apply: elif::fold_elif,
    },
    Rewrite {
        name: "body",
        apply: body::tag_body,
    },
];

/// Apply every rewrite to `tree`.
#[tracing::instrument(level = "debug", skip_all, fields(root = %tree.kind))]
pub fn transform(mut tree: Node) -> Node {
    let mut rewrites = 0usize;
    visit(&mut tree, &mut rewrites);
    tracing::debug!(rewrites, "transformed");
    tree
}

fn visit(node: &mut Node, rewrites: &mut usize) {
    ensure_sufficient_stack(|| {
        for child in &mut node.children {
            if let Child::Node(inner) = child {
                visit(inner, rewrites);
            }
        }
        for rewrite in REWRITES {
            if (rewrite.apply)(node) {
                *rewrites += 1;
                tracing::trace!(rewrite = rewrite.name, kind = %node.kind, "rewrote");
            }
        }
    });
}

/// Mutable access to child `index` when it is a node.
fn node_mut(node: &mut Node, index: usize) -> Option<&mut Node> {
    match node.children.get_mut(index)? {
        Child::Node(inner) => Some(inner),
        Child::Token(_) => None,
    }
}

/// Give a node a new kind and record which rewrite did it.
fn retag(node: &mut Node, kind: &str, by: &'static str) {
    node.kind = kind.to_owned();
    node.transformed_by = Some(by);
}
