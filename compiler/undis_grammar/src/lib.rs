//! Grammar assembly.
//!
//! A grammar is data: rule text for the 3.7 base, ordered deltas for later
//! versions and the PyPy runtime, and a customization pass that adds rules
//! whose shape depends on operand arity, only for opcodes the code object
//! actually uses.
//!
//! ```text
//! base 3.7 --(3.8 delta)--> --(PyPy delta)--> + customize(tokens) = Grammar
//! ```
//!
//! Every code object gets its own [`Grammar`]; nothing is shared between
//! objects, so a nested lambda's grammar stays as small as the lambda.

mod customize;
mod error;
mod grammar;
mod rule;
mod rules;

pub use customize::CustomizeMap;
pub use error::ConfigError;
pub use grammar::{assemble, CompileMode, Grammar, Target};
pub use rule::{parse_rules, Rule};
pub use rules::{is_collect, COLLECT};
