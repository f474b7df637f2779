//! Decode errors.

use undis_diagnostic::{Diagnostic, ErrorCode};

/// Malformed instruction stream for the claimed version.
///
/// Fatal for the code object being scanned; siblings are unaffected.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("unknown opcode {opcode} at offset {offset}")]
    UnknownOpcode { offset: u32, opcode: u8 },

    #[error("EXTENDED_ARG at offset {offset} does not prefix an instruction with an operand")]
    DanglingExtendedArg { offset: u32 },

    #[error("{op} at offset {offset} reads {table}[{index}] but the table has {len} entries")]
    OperandOutOfRange {
        offset: u32,
        op: &'static str,
        table: &'static str,
        index: u32,
        len: usize,
    },

    #[error("{op} at offset {offset} jumps to {target}, which is not an instruction boundary")]
    JumpOutOfRange {
        offset: u32,
        op: &'static str,
        target: u32,
    },

    #[error("instruction offset {offset} does not follow offset {previous}")]
    OffsetsNotIncreasing { offset: u32, previous: u32 },

    #[error("{op} at offset {offset} is missing its operand")]
    MissingOperand { offset: u32, op: &'static str },
}

impl DecodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::UnknownOpcode { .. } => ErrorCode::E1001,
            DecodeError::DanglingExtendedArg { .. } => ErrorCode::E1002,
            DecodeError::OperandOutOfRange { .. } => ErrorCode::E1003,
            DecodeError::JumpOutOfRange { .. } => ErrorCode::E1004,
            DecodeError::OffsetsNotIncreasing { .. } => ErrorCode::E1005,
            DecodeError::MissingOperand { .. } => ErrorCode::E1006,
        }
    }

    /// Byte offset of the offending instruction.
    pub fn offset(&self) -> u32 {
        match *self {
            DecodeError::UnknownOpcode { offset, .. }
            | DecodeError::DanglingExtendedArg { offset }
            | DecodeError::OperandOutOfRange { offset, .. }
            | DecodeError::JumpOutOfRange { offset, .. }
            | DecodeError::OffsetsNotIncreasing { offset, .. }
            | DecodeError::MissingOperand { offset, .. } => offset,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code()).with_message(self.to_string())
    }
}
