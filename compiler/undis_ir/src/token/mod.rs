//! Synthesized tokens.
//!
//! A [`Token`] is one instruction after synthesis: its kind may be
//! arity-specialized (`CALL_FUNCTION_2`), renamed by context (`JUMP_BACK`,
//! `LOAD_ASSERT`), or entirely synthetic (`COME_FROM`). The original mnemonic
//! is kept in [`Token::op`] so later stages can still ask what the machine
//! actually executes.

use std::cmp::Ordering;
use std::fmt;

use crate::Constant;

/// Position of a token within its code object.
///
/// `start` is the first byte of the instruction including any
/// `EXTENDED_ARG` prefixes; `op` is the byte offset of the instruction proper.
/// Jump targets always name a `start`. Join markers share the `start` of the
/// instruction they precede and carry their index in `join`; they sort before
/// that instruction.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Offset {
    pub start: u32,
    pub op: u32,
    pub join: Option<u16>,
}

impl Offset {
    /// Offset of an instruction without prefixes.
    pub fn at(op: u32) -> Self {
        Offset {
            start: op,
            op,
            join: None,
        }
    }

    /// Offset of an instruction preceded by `EXTENDED_ARG` prefixes.
    pub fn extended(start: u32, op: u32) -> Self {
        Offset {
            start,
            op,
            join: None,
        }
    }

    /// The `index`th join marker in front of `target`.
    #[must_use]
    pub fn join_marker(target: Offset, index: u16) -> Self {
        Offset {
            join: Some(index),
            ..target
        }
    }

    pub fn is_join(self) -> bool {
        self.join.is_some()
    }

    fn sort_key(self) -> (u32, u32) {
        (self.start, self.join.map_or(u32::MAX, u32::from))
    }
}

impl Ord for Offset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Offset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.join {
            Some(index) => write!(f, "{}.{index}", self.start),
            None if self.start != self.op => write!(f, "{}_{}", self.start, self.op),
            None => write!(f, "{}", self.op),
        }
    }
}

/// Decoded operand of a token.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum Attr {
    #[default]
    None,
    /// Raw integer operand: an arity, a flag set or a format spec.
    Int(u32),
    Const(Constant),
    /// Resolved name from `co_names`, `co_varnames` or the cell tables.
    Name(String),
    /// Jump target, the `start` of the instruction jumped to.
    Jump(u32),
    /// Comparison operator text.
    Compare(&'static str),
    /// Join marker: `start` of the jump that lands here.
    ComeFrom(u32),
}

impl Attr {
    pub fn as_int(&self) -> Option<u32> {
        match self {
            Attr::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_const(&self) -> Option<&Constant> {
        match self {
            Attr::Const(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Attr::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// One synthesized token. Immutable once the synthesizer hands it over.
#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    /// Grammar terminal, possibly arity-specialized.
    pub kind: String,
    /// Mnemonic the instruction was decoded from; `COME_FROM` and friends
    /// name themselves.
    pub op: &'static str,
    pub attr: Attr,
    /// Printable operand.
    pub pattr: String,
    pub offset: Offset,
    /// Source line when this instruction starts one.
    pub linestart: Option<u32>,
}

impl Token {
    pub fn new(kind: impl Into<String>, op: &'static str, offset: Offset) -> Self {
        Token {
            kind: kind.into(),
            op,
            attr: Attr::None,
            pattr: String::new(),
            offset,
            linestart: None,
        }
    }

    #[must_use]
    pub fn with_attr(mut self, attr: Attr, pattr: impl Into<String>) -> Self {
        self.attr = attr;
        self.pattr = pattr.into();
        self
    }

    /// Byte offset other instructions use to refer to this one.
    pub fn addr(&self) -> u32 {
        self.offset.start
    }

    pub fn jump_target(&self) -> Option<u32> {
        match self.attr {
            Attr::Jump(target) => Some(target),
            _ => None,
        }
    }

    /// Source offset recorded on a join marker.
    pub fn come_from(&self) -> Option<u32> {
        match self.attr {
            Attr::ComeFrom(source) => Some(source),
            _ => None,
        }
    }

    pub fn is_jump_back(&self) -> bool {
        self.jump_target().is_some_and(|target| target <= self.addr())
    }

    pub fn is_join(&self) -> bool {
        self.offset.is_join()
    }
}

impl fmt::Display for Token {
    /// Disassembly-style line: offset, kind, printable operand.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = self.offset.to_string();
        if self.pattr.is_empty() {
            write!(f, "{offset:>9}  {}", self.kind)
        } else {
            write!(f, "{offset:>9}  {:<24} {}", self.kind, self.pattr)
        }
    }
}

#[cfg(test)]
mod tests;
