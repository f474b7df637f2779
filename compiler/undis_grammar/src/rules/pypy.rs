//! PyPy over either CPython version: list comprehensions presize with
//! `BUILD_LIST_FROM_ARG`, and `assert` is skipped under `-O` by
//! `JUMP_IF_NOT_DEBUG`.

use super::Delta;

pub(crate) const PYPY: Delta = Delta {
    remove: "",
    add: r"
comp_func ::= LOAD_FAST BUILD_LIST_FROM_ARG ROT_TWO FOR_ITER store comp_iter JUMP_BACK RETURN_VALUE
stmt ::= ifstmt_debug
ifstmt_debug ::= JUMP_IF_NOT_DEBUG testexpr stmts come_froms
",
};
