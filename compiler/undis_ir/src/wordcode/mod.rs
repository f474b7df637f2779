//! Raw wordcode to instruction records.
//!
//! Since 3.6 every instruction is two bytes: opcode then operand byte. The
//! operand byte of an opcode below [`HAVE_ARGUMENT`](crate::HAVE_ARGUMENT)
//! is ignored. `EXTENDED_ARG` prefixes are kept as separate records; the
//! token synthesizer folds them.

use undis_diagnostic::ErrorCode;

use crate::{InstructionSet, RawInstruction};

/// Wordcode that cannot be split into instruction records.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum WordcodeError {
    #[error("wordcode has odd length {len}")]
    Truncated { len: usize },
    #[error("unknown opcode {opcode} at offset {offset}")]
    UnknownOpcode { offset: u32, opcode: u8 },
    #[error("wordcode of {len} bytes does not fit 32-bit offsets")]
    TooLarge { len: usize },
}

impl WordcodeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            WordcodeError::UnknownOpcode { .. } => ErrorCode::E1001,
            WordcodeError::Truncated { .. } | WordcodeError::TooLarge { .. } => ErrorCode::E1006,
        }
    }
}

/// Split `bytes` into instruction records.
///
/// `line_starts` maps byte offsets to the source line they begin, as
/// `(offset, line)` pairs in any order.
pub fn decode_wordcode(
    set: &InstructionSet,
    bytes: &[u8],
    line_starts: &[(u32, u32)],
) -> Result<Vec<RawInstruction>, WordcodeError> {
    if bytes.len() % 2 != 0 {
        return Err(WordcodeError::Truncated { len: bytes.len() });
    }
    if u32::try_from(bytes.len()).is_err() {
        return Err(WordcodeError::TooLarge { len: bytes.len() });
    }

    let mut out = Vec::with_capacity(bytes.len() / 2);
    for (offset, pair) in (0u32..).step_by(2).zip(bytes.chunks_exact(2)) {
        let (opcode, operand) = (pair[0], pair[1]);
        if set.name(opcode).is_none() {
            return Err(WordcodeError::UnknownOpcode { offset, opcode });
        }
        let arg = set.has_arg(opcode).then_some(u32::from(operand));
        let mut inst = RawInstruction::new(offset, opcode, arg);
        if let Some(&(_, line)) = line_starts.iter().find(|(at, _)| *at == offset) {
            inst = inst.with_line(line);
        }
        out.push(inst);
    }
    Ok(out)
}

#[cfg(test)]
mod tests;
