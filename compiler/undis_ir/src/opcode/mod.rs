//! Instruction-set tables.
//!
//! Maps opcode numbers to mnemonics per version and runtime, and classifies
//! jumps. The pipeline never hard-codes opcode numbers; the synthesizer and
//! the reduce-checks ask this table.
//!
//! Each version is described as a delta over the previous one, the same way
//! the grammar is: 3.8 drops the block-setup opcodes of 3.7's loop handling
//! and adds the finally-block opcodes; PyPy replaces the method-call pair.

mod tables;

use rustc_hash::FxHashMap;

use crate::{Variant, Version};

/// Opcodes at or above this number carry an operand.
pub const HAVE_ARGUMENT: u8 = 90;

/// How a jump operand encodes its target.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum JumpKind {
    /// Target is the offset of the next instruction plus the operand.
    Relative,
    /// Target is the operand itself.
    Absolute,
}

/// Opcode table for one version/variant pair.
#[derive(Clone, Debug)]
pub struct InstructionSet {
    version: Version,
    variant: Variant,
    names: FxHashMap<u8, &'static str>,
    opcodes: FxHashMap<&'static str, u8>,
}

impl InstructionSet {
    /// Table for a version/variant, or `None` when the version is unsupported.
    pub fn for_target(version: Version, variant: Variant) -> Option<Self> {
        let mut ops: Vec<(&'static str, u8)> = tables::BASE_3_7.to_vec();
        if version == Version::V3_8 {
            apply_delta(&mut ops, tables::REMOVED_IN_3_8, tables::ADDED_IN_3_8);
        } else if version != Version::V3_7 {
            return None;
        }
        if variant.is_pypy() {
            apply_delta(&mut ops, tables::REMOVED_IN_PYPY, tables::ADDED_IN_PYPY);
        }

        let names = ops.iter().map(|&(name, op)| (op, name)).collect();
        let opcodes = ops.into_iter().collect();
        Some(InstructionSet {
            version,
            variant,
            names,
            opcodes,
        })
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Mnemonic for an opcode number.
    pub fn name(&self, opcode: u8) -> Option<&'static str> {
        self.names.get(&opcode).copied()
    }

    /// Opcode number for a mnemonic.
    pub fn opcode(&self, name: &str) -> Option<u8> {
        self.opcodes.get(name).copied()
    }

    pub fn has_arg(&self, opcode: u8) -> bool {
        opcode >= HAVE_ARGUMENT
    }

    /// Jump classification for a mnemonic, `None` for non-jumps.
    pub fn jump_kind(&self, name: &str) -> Option<JumpKind> {
        if tables::RELATIVE_JUMPS.contains(&name) {
            Some(JumpKind::Relative)
        } else if tables::ABSOLUTE_JUMPS.contains(&name) {
            Some(JumpKind::Absolute)
        } else {
            None
        }
    }

    /// Conditional jumps: the instruction may fall through.
    pub fn is_conditional_jump(&self, name: &str) -> bool {
        tables::CONDITIONAL_JUMPS.contains(&name)
    }

    /// Block-setup instructions whose operand names the end of a block.
    pub fn is_block_setup(&self, name: &str) -> bool {
        name.starts_with("SETUP_")
    }

    /// Operator text for a `COMPARE_OP` operand.
    pub fn compare_op(&self, arg: u32) -> Option<&'static str> {
        self.compare_ops().get(arg as usize).copied()
    }

    /// The whole `cmp_op` table, indexed by `COMPARE_OP` operand.
    pub fn compare_ops(&self) -> &'static [&'static str] {
        tables::COMPARE_OPS
    }

    /// Compute the target of a jump at `offset` (wordcode: next = offset + 2).
    pub fn jump_target(&self, kind: JumpKind, offset: u32, arg: u32) -> u32 {
        match kind {
            JumpKind::Relative => offset.saturating_add(2).saturating_add(arg),
            JumpKind::Absolute => arg,
        }
    }
}

fn apply_delta(
    ops: &mut Vec<(&'static str, u8)>,
    removed: &[&'static str],
    added: &[(&'static str, u8)],
) {
    ops.retain(|(name, _)| !removed.contains(name));
    ops.extend_from_slice(added);
}
