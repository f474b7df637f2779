//! A small assembler: mnemonics go through the real instruction-set table,
//! so tests exercise opcode decoding too.

use std::sync::Arc;

use undis_driver::{decompile, Artifact, CodeObject, DecompileConfig, Variant, Version};
use undis_ir::{Constant, InstructionSet, RawInstruction};

pub struct Asm {
    set: InstructionSet,
    code: CodeObject,
    offset: u32,
    line: Option<u32>,
}

impl Asm {
    pub fn new(version: Version, name: &str) -> Self {
        Asm::for_variant(version, Variant::CPython, name)
    }

    pub fn for_variant(version: Version, variant: Variant, name: &str) -> Self {
        Asm {
            set: InstructionSet::for_target(version, variant).expect("supported target"),
            code: CodeObject {
                name: name.into(),
                ..CodeObject::default()
            },
            offset: 0,
            line: None,
        }
    }

    pub fn consts(mut self, consts: Vec<Constant>) -> Self {
        self.code.consts = consts;
        self
    }

    pub fn names(mut self, names: &[&str]) -> Self {
        self.code.names = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    /// Parameters first, then other locals.
    pub fn locals(mut self, argcount: u32, varnames: &[&str]) -> Self {
        self.code.argcount = argcount;
        self.code.varnames = varnames.iter().map(|n| (*n).to_string()).collect();
        self
    }

    /// The next instruction starts source line `line`.
    pub fn line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn op(mut self, mnemonic: &str, arg: u32) -> Self {
        let opcode = self
            .set
            .opcode(mnemonic)
            .unwrap_or_else(|| panic!("{mnemonic} is not in the table"));
        let mut raw = RawInstruction::new(self.offset, opcode, self.set.has_arg(opcode).then_some(arg));
        if let Some(line) = self.line.take() {
            raw = raw.with_line(line);
        }
        self.code.instructions.push(raw);
        self.offset += 2;
        self
    }

    pub fn ops(self, ops: &[(&str, u32)]) -> Self {
        ops.iter().fold(self, |asm, &(mnemonic, arg)| asm.op(mnemonic, arg))
    }

    pub fn build(self) -> CodeObject {
        self.code
    }
}

pub fn code(inner: CodeObject) -> Constant {
    Constant::Code(Arc::new(inner))
}

pub fn artifact(version: Version, module: CodeObject) -> Artifact {
    Artifact {
        version,
        variant: Variant::CPython,
        filename: None,
        timestamp: None,
        source_size: None,
        code: Arc::new(module),
    }
}

/// Body text without the header.
pub fn render(version: Version, module: CodeObject) -> String {
    let config = DecompileConfig::default().without_header();
    decompile(&artifact(version, module), &config)
        .unwrap_or_else(|e| panic!("{}", e.to_diagnostic()))
        .text
}
