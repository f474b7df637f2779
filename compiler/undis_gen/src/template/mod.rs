//! Format templates.
//!
//! Most node kinds render from a template: literal text with directives.
//!
//! | directive | emits |
//! |---|---|
//! | `%\|` | current indentation |
//! | `%+` / `%-` | nothing; indents / dedents what follows |
//! | `%c(N)` | child `N` |
//! | `%p(N,P)` | child `N`, parenthesized if it binds looser than `P` |
//! | `%C(A,B)` | children `A..B` joined by `, `; a negative `B` counts from the end, an empty one runs to the end |
//! | `%a(N)` | the printable attribute of token child `N` |
//! | `%%` | `%` |
//!
//! Kinds whose text depends on more than child positions (calls with
//! keywords, function definitions, comprehensions, f-strings) name a
//! [`Custom`] handler instead. The table is built once per generator: the
//! 3.7 set, then per-version overrides.

use rustc_hash::FxHashMap;
use undis_ir::Version;

use crate::InternalError;

/// End of a child run.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Bound {
    At(usize),
    FromEnd(usize),
}

impl Bound {
    pub(crate) fn resolve(self, len: usize) -> Option<usize> {
        match self {
            Bound::At(index) => (index <= len).then_some(index),
            Bound::FromEnd(back) => len.checked_sub(back),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Piece {
    Text(&'static str),
    Indent,
    Push,
    Pop,
    Child { index: usize, threshold: u8 },
    Run { start: usize, end: Bound },
    Attr(usize),
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    pub(crate) fn parse(kind: &str, text: &'static str) -> Result<Self, InternalError> {
        let bad = || InternalError::MalformedTemplate {
            kind: kind.to_owned(),
            template: text.to_owned(),
        };
        let mut pieces = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let Some(at) = rest.find('%') else {
                pieces.push(Piece::Text(rest));
                break;
            };
            if at > 0 {
                pieces.push(Piece::Text(&rest[..at]));
            }
            let directive = rest[at + 1..].chars().next().ok_or_else(bad)?;
            rest = &rest[at + 1 + directive.len_utf8()..];
            let piece = match directive {
                '|' => Piece::Indent,
                '+' => Piece::Push,
                '-' => Piece::Pop,
                '%' => Piece::Text("%"),
                'c' | 'p' | 'C' | 'a' => {
                    let inner = rest.strip_prefix('(').ok_or_else(bad)?;
                    let close = inner.find(')').ok_or_else(bad)?;
                    let args: Vec<&str> = inner[..close].split(',').map(str::trim).collect();
                    rest = &inner[close + 1..];
                    let number = |arg: &str| arg.parse::<usize>().map_err(|_| bad());
                    match (directive, args.as_slice()) {
                        ('c', [n]) => Piece::Child {
                            index: number(n)?,
                            threshold: 0,
                        },
                        ('p', [n, p]) => Piece::Child {
                            index: number(n)?,
                            threshold: p.parse().map_err(|_| bad())?,
                        },
                        ('C', [a, b]) => Piece::Run {
                            start: number(a)?,
                            end: match b.strip_prefix('-') {
                                _ if b.is_empty() => Bound::FromEnd(0),
                                Some(back) => Bound::FromEnd(number(back)?),
                                None => Bound::At(number(b)?),
                            },
                        },
                        ('a', [n]) => Piece::Attr(number(n)?),
                        _ => return Err(bad()),
                    }
                }
                _ => return Err(bad()),
            };
            pieces.push(piece);
        }
        Ok(Template { pieces })
    }

    pub(crate) fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
}

/// Handlers for kinds a template cannot express.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Custom {
    Stmts,
    Stmt,
    Each,
    Target,
    Delete,
    Unpack,
    Import,
    ImportFrom,
    ImportStar,
    FunctionDef,
    ClassDef,
    Docstring,
    Assert,
    Test,
    Operator,
    Binary,
    Sequence(&'static str, &'static str),
    /// Open, close, and the literal kind spliced back in place.
    Unpacking(&'static str, &'static str, &'static str),
    Dict,
    DictUnpack,
    Slice,
    CallKw,
    CallEx,
    Yield,
    Lambda,
    Comprehension(&'static str, &'static str),
    JoinedStr,
    FormattedValue,
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) enum Format {
    Template(Template),
    Custom(Custom),
}

enum Entry {
    T(&'static str),
    C(Custom),
}

use Entry::{C, T};

/// Template for a `key: value` entry of a dict comprehension; the operand
/// order of `MAP_ADD` changed in 3.8.
pub(crate) const MAP_ENTRY: &str = "map_entry";

const BASE: &[(&str, Entry)] = &[
    ("module", T("%c(0)")),
    ("return_last", T("")),
    ("lambda_start", T("%p(0,1)")),
    ("stmts", C(Custom::Stmts)),
    ("stmt", C(Custom::Stmt)),
    // Simple statements
    ("expr_stmt", T("%|%c(0)\n")),
    ("assign", T("%|%c(1) = %c(0)\n")),
    ("assign2", T("%|%c(2) = %c(3) = %c(0)\n")),
    ("swap_assign", T("%|%c(3), %c(4) = %p(0,1), %p(1,1)\n")),
    ("aug_assign1", T("%|%c(3) %c(2) %c(1)\n")),
    ("aug_assign2", T("%|%p(0,16).%a(2) %c(4) %c(3)\n")),
    ("aug_assign3", T("%|%p(0,16)[%c(1)] %c(5) %c(4)\n")),
    ("store", C(Custom::Target)),
    ("unpack", C(Custom::Unpack)),
    ("del_stmt", C(Custom::Delete)),
    ("return", T("%|return %c(0)\n")),
    ("raise_stmt0", T("%|raise\n")),
    ("raise_stmt1", T("%|raise %c(0)\n")),
    ("raise_stmt2", T("%|raise %c(0) from %c(1)\n")),
    ("import", C(Custom::Import)),
    ("import_from", C(Custom::ImportFrom)),
    ("import_star", C(Custom::ImportStar)),
    ("function_def", C(Custom::FunctionDef)),
    ("classdef", C(Custom::ClassDef)),
    ("class_preamble", T("")),
    ("docstring", C(Custom::Docstring)),
    ("assert", C(Custom::Assert)),
    ("assert2", C(Custom::Assert)),
    // Compound statements
    ("testexpr", T("%c(0)")),
    ("testfalse", C(Custom::Test)),
    ("testtrue", T("not %p(0,5)")),
    ("ifstmt", T("%|if %c(0):\n%+%c(1)%-")),
    ("ifelsestmt", T("%|if %c(0):\n%+%c(1)%-%|else:\n%+%c(4)%-")),
    ("ifelsestmtc", T("%|if %c(0):\n%+%c(1)%-%|else:\n%+%c(4)%-")),
    ("ifelifstmt", T("%|if %c(0):\n%+%c(1)%-%c(4)")),
    ("elifstmt", T("%|elif %c(0):\n%+%c(1)%-")),
    ("elifelsestmt", T("%|elif %c(0):\n%+%c(1)%-%|else:\n%+%c(4)%-")),
    ("elifelifstmt", T("%|elif %c(0):\n%+%c(1)%-%c(4)")),
    ("ifstmt_debug", T("%|if __debug__:\n%+%|if %c(1):\n%+%c(2)%-%-")),
    ("whilestmt", T("%|while %c(1):\n%+%c(2)%-")),
    ("while1stmt", T("%|while True:\n%+%c(1)%-")),
    ("forstmt", T("%|for %c(4) in %c(1):\n%+%c(5)%-")),
    ("break", T("%|break\n")),
    ("continue", T("%|continue\n")),
    ("try_except", T("%|try:\n%+%c(1)%-%c(5)")),
    ("except_handlers", C(Custom::Each)),
    ("except_handler", T("%c(0)%+%c(1)%-")),
    ("except_cond", T("%|except %c(1):\n")),
    ("except_bare", T("%|except:\n")),
    // Expressions
    ("expr", T("%c(0)")),
    ("attribute", T("%p(0,16).%a(1)")),
    ("subscript", T("%p(0,16)[%c(1)]")),
    ("slice", C(Custom::Slice)),
    ("binary_expr", C(Custom::Binary)),
    ("binary_op", C(Custom::Operator)),
    ("inplace_op", C(Custom::Operator)),
    ("unary_op", C(Custom::Operator)),
    ("unary_expr", T("%c(1)%p(0,13)")),
    ("unary_not", T("not %p(0,5)")),
    ("compare", T("%p(0,7) %a(2) %p(1,7)")),
    ("and", T("%p(0,4) and %p(2,4)")),
    ("or", T("%p(0,3) or %p(2,3)")),
    ("if_exp", T("%p(2,3) if %p(0,3) else %p(5,2)")),
    ("call", T("%p(0,16)(%C(1,-1))")),
    ("call_kw", C(Custom::CallKw)),
    ("call_method", T("%p(0,16).%a(1)(%C(2,-1))")),
    ("call_ex", C(Custom::CallEx)),
    ("call_ex_kw", C(Custom::CallEx)),
    ("list", C(Custom::Sequence("[", "]"))),
    ("set", C(Custom::Sequence("{", "}"))),
    ("tuple", C(Custom::Sequence("(", ")"))),
    ("dict", C(Custom::Dict)),
    ("dict_const", C(Custom::Dict)),
    ("list_unpack", C(Custom::Unpacking("[", "]", "list"))),
    ("set_unpack", C(Custom::Unpacking("{", "}", "set"))),
    ("tuple_unpack", C(Custom::Unpacking("(", ")", "tuple"))),
    ("unpack_args", C(Custom::Unpacking("(", ")", "tuple"))),
    ("dict_unpack", C(Custom::DictUnpack)),
    ("unpack_kwargs", C(Custom::DictUnpack)),
    ("joined_str", C(Custom::JoinedStr)),
    ("formatted_value", C(Custom::FormattedValue)),
    ("formatted_value_attr", C(Custom::FormattedValue)),
    ("yield", C(Custom::Yield)),
    ("mklambda", C(Custom::Lambda)),
    ("listcomp", C(Custom::Comprehension("[", "]"))),
    ("setcomp", C(Custom::Comprehension("{", "}"))),
    ("dictcomp", C(Custom::Comprehension("{", "}"))),
    ("genexpr", C(Custom::Comprehension("(", ")"))),
    (MAP_ENTRY, T("%p(1,1): %p(0,1)")),
];

/// 3.8: loops lost their `SETUP_LOOP` prefix, and `MAP_ADD` takes the key
/// first.
const PYTHON38: &[(&str, Entry)] = &[
    ("whilestmt", T("%|while %c(0):\n%+%c(1)%-")),
    ("while1stmt", T("%|while True:\n%+%c(0)%-")),
    ("forstmt", T("%|for %c(3) in %c(0):\n%+%c(4)%-")),
    (MAP_ENTRY, T("%p(0,1): %p(1,1)")),
];

/// Kind -> format, for one bytecode version.
pub(crate) struct TemplateTable {
    formats: FxHashMap<&'static str, Format>,
}

impl TemplateTable {
    pub(crate) fn new(version: Version) -> Result<Self, InternalError> {
        let mut formats = FxHashMap::default();
        let layers: &[&[(&str, Entry)]] = if version >= Version::V3_8 {
            &[BASE, PYTHON38]
        } else {
            &[BASE]
        };
        for layer in layers {
            for (kind, entry) in layer.iter() {
                let format = match entry {
                    T(text) => Format::Template(Template::parse(kind, *text)?),
                    C(custom) => Format::Custom(*custom),
                };
                formats.insert(*kind, format);
            }
        }
        Ok(TemplateTable { formats })
    }

    pub(crate) fn get(&self, kind: &str) -> Option<&Format> {
        self.formats.get(kind)
    }
}
