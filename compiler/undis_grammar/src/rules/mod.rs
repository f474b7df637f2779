//! Rule sets: the 3.7 base and the deltas layered on top of it.

mod python37;
mod python38;
mod pypy;

pub(crate) use pypy::PYPY;
pub(crate) use python37::PYTHON37;
pub(crate) use python38::PYTHON38;

/// An ordered patch over the previous rule set.
pub(crate) struct Delta {
    pub remove: &'static str,
    pub add: &'static str,
}

/// List-like nonterminals. Their left-recursive derivations are flattened
/// into one node holding every element.
pub const COLLECT: &[&str] = &[
    "stmts",
    "come_froms",
    "add_consts",
    "except_handlers",
    "import_froms",
    "and_conds",
    "or_conds",
];

pub fn is_collect(symbol: &str) -> bool {
    COLLECT.contains(&symbol)
}
