//! Operator precedence.
//!
//! Higher binds tighter. A node whose precedence is below the threshold its
//! parent renders it under gets parenthesized; nothing else ever adds
//! parentheses.

use undis_ir::{Child, Constant, Node, Token};

/// Names, constants, displays and comprehensions.
pub(crate) const ATOM: u8 = 17;

/// Threshold for the items of a comma-separated run: only bare tuples and
/// `yield` need parentheses there.
pub(crate) const ITEM: u8 = 1;

const PRECEDENCE: &[(&str, u8)] = &[
    ("yield", 0),
    ("unpack", 0),
    ("mklambda", 1),
    ("if_exp", 2),
    ("or", 3),
    ("and", 4),
    ("unary_not", 5),
    ("testtrue", 5),
    ("compare", 6),
    ("unary_expr", 13),
    ("attribute", 16),
    ("subscript", 16),
    ("call", 16),
    ("call_kw", 16),
    ("call_method", 16),
    ("call_ex", 16),
    ("call_ex_kw", 16),
    ("list", ATOM),
    ("tuple", ATOM),
    ("set", ATOM),
    ("dict", ATOM),
    ("dict_const", ATOM),
    ("list_unpack", ATOM),
    ("set_unpack", ATOM),
    ("tuple_unpack", ATOM),
    ("dict_unpack", ATOM),
    ("unpack_args", ATOM),
    ("unpack_kwargs", ATOM),
    ("joined_str", ATOM),
    ("formatted_value", ATOM),
    ("formatted_value_attr", ATOM),
    ("listcomp", ATOM),
    ("setcomp", ATOM),
    ("dictcomp", ATOM),
    ("genexpr", ATOM),
];

/// Single-child wrappers that take the precedence of what they wrap.
const TRANSPARENT: &[&str] = &["expr", "store", "testexpr"];

/// Operator tokens: kind, source text, precedence. Augmented assignments
/// are statements and carry no precedence.
const OPERATORS: &[(&str, &str, u8)] = &[
    ("BINARY_OR", "|", 7),
    ("BINARY_XOR", "^", 8),
    ("BINARY_AND", "&", 9),
    ("BINARY_LSHIFT", "<<", 10),
    ("BINARY_RSHIFT", ">>", 10),
    ("BINARY_ADD", "+", 11),
    ("BINARY_SUBTRACT", "-", 11),
    ("BINARY_MULTIPLY", "*", 12),
    ("BINARY_MATRIX_MULTIPLY", "@", 12),
    ("BINARY_TRUE_DIVIDE", "/", 12),
    ("BINARY_FLOOR_DIVIDE", "//", 12),
    ("BINARY_MODULO", "%", 12),
    ("BINARY_POWER", "**", 14),
    ("UNARY_POSITIVE", "+", 13),
    ("UNARY_NEGATIVE", "-", 13),
    ("UNARY_INVERT", "~", 13),
    ("INPLACE_OR", "|=", 0),
    ("INPLACE_XOR", "^=", 0),
    ("INPLACE_AND", "&=", 0),
    ("INPLACE_LSHIFT", "<<=", 0),
    ("INPLACE_RSHIFT", ">>=", 0),
    ("INPLACE_ADD", "+=", 0),
    ("INPLACE_SUBTRACT", "-=", 0),
    ("INPLACE_MULTIPLY", "*=", 0),
    ("INPLACE_MATRIX_MULTIPLY", "@=", 0),
    ("INPLACE_TRUE_DIVIDE", "/=", 0),
    ("INPLACE_FLOOR_DIVIDE", "//=", 0),
    ("INPLACE_MODULO", "%=", 0),
    ("INPLACE_POWER", "**=", 0),
];

/// Source text and precedence of an operator token kind.
pub(crate) fn operator(kind: &str) -> Option<(&'static str, u8)> {
    OPERATORS
        .iter()
        .find(|(k, _, _)| *k == kind)
        .map(|&(_, text, prec)| (text, prec))
}

/// Integer literals: a `.` right after one would read as a decimal point,
/// so they sit just below attribute access.
pub(crate) const INT_LITERAL: u8 = 15;

fn of_token(tok: &Token) -> u8 {
    match tok.attr.as_const() {
        Some(constant) if constant.is_negative_number() => 13,
        Some(Constant::Int(_) | Constant::BigInt(_)) => INT_LITERAL,
        _ => ATOM,
    }
}

fn of_child(child: &Child) -> Option<u8> {
    match child {
        Child::Token(tok) => Some(of_token(tok)),
        Child::Node(node) => of(node),
    }
}

/// Precedence of a node, or `None` for statements and other nodes that are
/// never parenthesized.
pub(crate) fn of(node: &Node) -> Option<u8> {
    match node.kind.as_str() {
        "binary_expr" => {
            let op = node.node(2)?.token(0)?;
            operator(&op.kind).map(|(_, prec)| prec)
        }
        "testfalse" if node.node(0).is_some_and(|n| n.is("and_conds")) => Some(4),
        "testfalse" if node.node(0).is_some_and(|n| n.is("or_conds")) => Some(3),
        "testfalse" => of_child(node.child(0)?),
        kind if TRANSPARENT.contains(&kind) && node.len() == 1 => of_child(node.child(0)?),
        kind => PRECEDENCE
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|&(_, prec)| prec),
    }
}
