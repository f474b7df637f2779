//! Per-instruction token kinds and decoded operands.

use undis_ir::{Attr, CodeObject, Constant, InstructionSet, Offset, Token};

use super::decode::Decoded;
use super::joins::Joins;
use crate::DecodeError;

/// Opcodes whose operand is an element count (or flag set) that becomes
/// part of the token kind.
const ARITY_SPECIALIZED: &[&str] = &[
    "BUILD_LIST",
    "BUILD_TUPLE",
    "BUILD_SET",
    "BUILD_MAP",
    "BUILD_CONST_KEY_MAP",
    "BUILD_STRING",
    "BUILD_SLICE",
    "BUILD_LIST_UNPACK",
    "BUILD_TUPLE_UNPACK",
    "BUILD_SET_UNPACK",
    "BUILD_MAP_UNPACK",
    "BUILD_TUPLE_UNPACK_WITH_CALL",
    "BUILD_MAP_UNPACK_WITH_CALL",
    "CALL_FUNCTION",
    "CALL_FUNCTION_KW",
    "CALL_METHOD",
    "UNPACK_SEQUENCE",
    "MAKE_FUNCTION",
    "RAISE_VARARGS",
];

/// Where an operand is resolved.
enum Operand {
    Const,
    Name,
    Local,
    Cell,
    Compare,
    Jump,
    Arity,
    Plain,
}

fn operand_of(name: &str, set: &InstructionSet) -> Operand {
    match name {
        "LOAD_CONST" => Operand::Const,
        "LOAD_NAME" | "STORE_NAME" | "DELETE_NAME" | "LOAD_GLOBAL" | "STORE_GLOBAL"
        | "DELETE_GLOBAL" | "LOAD_ATTR" | "STORE_ATTR" | "DELETE_ATTR" | "IMPORT_NAME"
        | "IMPORT_FROM" | "LOAD_METHOD" | "LOOKUP_METHOD" => Operand::Name,
        "LOAD_FAST" | "STORE_FAST" | "DELETE_FAST" => Operand::Local,
        "LOAD_CLOSURE" | "LOAD_DEREF" | "STORE_DEREF" | "DELETE_DEREF" | "LOAD_CLASSDEREF" => {
            Operand::Cell
        }
        "COMPARE_OP" => Operand::Compare,
        _ if set.jump_kind(name).is_some() => Operand::Jump,
        _ if ARITY_SPECIALIZED.contains(&name) => Operand::Arity,
        _ => Operand::Plain,
    }
}

/// Kind for a code constant, by the name the compiler gave it.
fn code_load_kind(code: &CodeObject) -> &'static str {
    match code.name.as_str() {
        "<lambda>" => "LOAD_LAMBDA",
        "<listcomp>" => "LOAD_LISTCOMP",
        "<setcomp>" => "LOAD_SETCOMP",
        "<dictcomp>" => "LOAD_DICTCOMP",
        "<genexpr>" => "LOAD_GENEXPR",
        _ => "LOAD_CODE",
    }
}

pub(super) fn synthesize(
    code: &CodeObject,
    set: &InstructionSet,
    decoded: &[Decoded],
    joins: &Joins,
) -> Result<Vec<Token>, DecodeError> {
    let mut tokens = Vec::with_capacity(decoded.len() + joins.markers.len());
    let last = decoded.len().checked_sub(1);

    for (i, d) in decoded.iter().enumerate() {
        let offset = if d.start == d.offset {
            Offset::at(d.offset)
        } else {
            Offset::extended(d.start, d.offset)
        };

        if let Some(markers) = joins.markers.get(&d.start) {
            for (index, join) in (0u16..).zip(markers) {
                tokens.push(
                    Token::new(join.kind, join.kind, Offset::join_marker(offset, index))
                        .with_attr(Attr::ComeFrom(join.source), join.source.to_string()),
                );
            }
        }

        let prev = i.checked_sub(1).and_then(|p| decoded.get(p));
        let mut tok = token_for(code, set, joins, d, offset, prev, Some(i) == last)?;
        tok.linestart = d.line;
        tokens.push(tok);
    }
    Ok(tokens)
}

fn lookup<'c, T>(
    table: &'c [T],
    name: &'static str,
    d: &Decoded,
    arg: u32,
) -> Result<&'c T, DecodeError> {
    table
        .get(arg as usize)
        .ok_or(DecodeError::OperandOutOfRange {
            offset: d.offset,
            op: d.name,
            table: name,
            index: arg,
            len: table.len(),
        })
}

fn loads_none(code: &CodeObject, d: &Decoded) -> bool {
    d.name == "LOAD_CONST"
        && d
            .arg
            .and_then(|arg| code.consts.get(arg as usize))
            .is_some_and(Constant::is_none)
}

fn token_for(
    code: &CodeObject,
    set: &InstructionSet,
    joins: &Joins,
    d: &Decoded,
    offset: Offset,
    prev: Option<&Decoded>,
    is_last: bool,
) -> Result<Token, DecodeError> {
    let name = d.name;
    let Some(arg) = d.arg else {
        let kind = if name == "RETURN_VALUE" && is_last && prev.is_some_and(|p| loads_none(code, p))
        {
            "RETURN_LAST"
        } else {
            name
        };
        return Ok(Token::new(kind, name, offset));
    };

    let tok = match operand_of(name, set) {
        Operand::Const => {
            let value = lookup(&code.consts, "co_consts", d, arg)?;
            let (kind, pattr) = match value {
                Constant::Code(inner) => (code_load_kind(inner), inner.name.clone()),
                Constant::Str(_) => ("LOAD_STR", value.repr()),
                _ => (name, value.repr()),
            };
            Token::new(kind, name, offset).with_attr(Attr::Const(value.clone()), pattr)
        }
        Operand::Name => {
            let value = lookup(&code.names, "co_names", d, arg)?;
            let is_assert = matches!(name, "LOAD_GLOBAL" | "LOAD_NAME")
                && value == "AssertionError"
                && prev.is_some_and(|p| p.name == "POP_JUMP_IF_TRUE");
            let kind = if is_assert { "LOAD_ASSERT" } else { name };
            Token::new(kind, name, offset).with_attr(Attr::Name(value.clone()), value.clone())
        }
        Operand::Local => {
            let value = lookup(&code.varnames, "co_varnames", d, arg)?;
            Token::new(name, name, offset).with_attr(Attr::Name(value.clone()), value.clone())
        }
        Operand::Cell => {
            let value = code
                .cell_or_free(arg as usize)
                .ok_or(DecodeError::OperandOutOfRange {
                    offset: d.offset,
                    op: name,
                    table: "co_cellvars+co_freevars",
                    index: arg,
                    len: code.cellvars.len() + code.freevars.len(),
                })?;
            Token::new(name, name, offset).with_attr(Attr::Name(value.to_owned()), value)
        }
        Operand::Compare => {
            let op = *lookup(set.compare_ops(), "cmp_op", d, arg)?;
            Token::new(name, name, offset).with_attr(Attr::Compare(op), op)
        }
        Operand::Jump => {
            let target = joins.target_of(d.start).ok_or(DecodeError::JumpOutOfRange {
                offset: d.offset,
                op: name,
                target: arg,
            })?;
            let kind = if name == "JUMP_ABSOLUTE" && target <= d.start {
                "JUMP_BACK"
            } else {
                name
            };
            Token::new(kind, name, offset).with_attr(Attr::Jump(target), target.to_string())
        }
        Operand::Arity => Token::new(format!("{name}_{arg}"), name, offset)
            .with_attr(Attr::Int(arg), arg.to_string()),
        Operand::Plain => {
            let kind = match name {
                "CALL_FUNCTION_EX" if arg & 1 != 0 => "CALL_FUNCTION_EX_KW",
                "FORMAT_VALUE" if arg & 4 != 0 => "FORMAT_VALUE_ATTR",
                _ => name,
            };
            Token::new(kind, name, offset).with_attr(Attr::Int(arg), arg.to_string())
        }
    };
    Ok(tok)
}
