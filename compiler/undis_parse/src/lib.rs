//! Disambiguating parser.
//!
//! An Earley chart parser over the grammar assembled for one code object.
//! The grammar is deliberately ambiguous: the same flat jump sequence can be
//! an `if`, the head of a loop, or half of an `if`/`else`. Three things pick
//! the one tree that comes out:
//!
//! 1. **Reduce checks** veto reductions whose jump offsets do not fit the
//!    construct (see `checks`). A vetoed item is never completed, so the
//!    chart simply backtracks to whatever else derives the span.
//! 2. **Preference**: when several rules still derive the same span, a fixed
//!    order of statement shapes decides; then shorter rules; then grammar
//!    order.
//! 3. **Longest last child**: among splits of one rule, the last child
//!    takes as much as it can.
//!
//! List-like nonterminals (`stmts`, `come_froms`, ...) come out flat: one
//! node holding every element.

mod chart;
mod checks;
mod derive;
mod error;
mod parser;

pub use error::ParseError;
pub use parser::{parse, ParseConfig};
