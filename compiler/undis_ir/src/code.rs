//! The artifact-reader tuple: code objects and their raw instructions.

use std::sync::Arc;

use bitflags::bitflags;

use crate::{Constant, Variant, Version};

bitflags! {
    /// `co_flags` bits the generator cares about.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct CodeFlags: u32 {
        const OPTIMIZED = 0x0001;
        const NEWLOCALS = 0x0002;
        const VARARGS = 0x0004;
        const VARKEYWORDS = 0x0008;
        const NESTED = 0x0010;
        const GENERATOR = 0x0020;
        const NOFREE = 0x0040;
        const COROUTINE = 0x0080;
    }
}

/// One undecoded instruction as the artifact reader hands it over.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RawInstruction {
    /// Byte offset of the instruction.
    pub offset: u32,
    pub opcode: u8,
    /// Operand, present for opcodes at or above `HAVE_ARGUMENT`.
    pub arg: Option<u32>,
    /// Source line if this instruction starts one.
    pub starts_line: Option<u32>,
}

impl RawInstruction {
    pub fn new(offset: u32, opcode: u8, arg: Option<u32>) -> Self {
        RawInstruction {
            offset,
            opcode,
            arg,
            starts_line: None,
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.starts_line = Some(line);
        self
    }
}

/// One compiled unit: module, function, class body, lambda or comprehension.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CodeObject {
    pub name: String,
    pub filename: String,
    pub first_line: u32,
    pub argcount: u32,
    pub posonlyargcount: u32,
    pub kwonlyargcount: u32,
    pub flags: CodeFlags,
    pub consts: Vec<Constant>,
    pub names: Vec<String>,
    pub varnames: Vec<String>,
    pub cellvars: Vec<String>,
    pub freevars: Vec<String>,
    pub instructions: Vec<RawInstruction>,
}

impl CodeObject {
    /// Name used by `LOAD_CLOSURE`/`LOAD_DEREF`: cells first, then free vars.
    pub fn cell_or_free(&self, index: usize) -> Option<&str> {
        match index.checked_sub(self.cellvars.len()) {
            None => self.cellvars.get(index),
            Some(free) => self.freevars.get(free),
        }
        .map(String::as_str)
    }

    pub fn is_lambda(&self) -> bool {
        self.name == "<lambda>"
    }

    /// Comprehension bodies and generator expressions.
    pub fn is_comprehension(&self) -> bool {
        matches!(
            self.name.as_str(),
            "<listcomp>" | "<setcomp>" | "<dictcomp>" | "<genexpr>"
        )
    }

    /// Positional parameter names followed by keyword-only ones, then
    /// `*args` and `**kwargs` when the flags say they exist.
    pub fn parameter_names(&self) -> &[String] {
        let mut count = (self.argcount + self.kwonlyargcount) as usize;
        if self.flags.contains(CodeFlags::VARARGS) {
            count += 1;
        }
        if self.flags.contains(CodeFlags::VARKEYWORDS) {
            count += 1;
        }
        &self.varnames[..count.min(self.varnames.len())]
    }
}

/// Everything the artifact reader produces for one compiled file.
#[derive(Clone, PartialEq, Debug)]
pub struct Artifact {
    pub version: Version,
    pub variant: Variant,
    /// Originating source file, when the container records one.
    pub filename: Option<String>,
    /// Compile timestamp (seconds since the epoch), when known.
    pub timestamp: Option<u64>,
    /// Source size recorded in the container header, when known.
    pub source_size: Option<u64>,
    pub code: Arc<CodeObject>,
}
