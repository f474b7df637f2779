//! `EXTENDED_ARG` merging.

use undis_ir::{CodeObject, InstructionSet};

use crate::DecodeError;

/// One instruction with its prefixes folded in.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(super) struct Decoded {
    /// Offset of the first prefix, or of the instruction when unprefixed.
    pub start: u32,
    pub offset: u32,
    pub name: &'static str,
    pub arg: Option<u32>,
    pub line: Option<u32>,
}

pub(super) fn merge_extended_args(
    code: &CodeObject,
    set: &InstructionSet,
) -> Result<Vec<Decoded>, DecodeError> {
    let mut out = Vec::with_capacity(code.instructions.len());
    // (start, accumulated high bits, first line seen)
    let mut pending: Option<(u32, u32, Option<u32>)> = None;
    let mut previous: Option<u32> = None;

    for inst in &code.instructions {
        if let Some(previous) = previous {
            if inst.offset <= previous {
                return Err(DecodeError::OffsetsNotIncreasing {
                    offset: inst.offset,
                    previous,
                });
            }
        }
        previous = Some(inst.offset);

        let Some(name) = set.name(inst.opcode) else {
            return Err(DecodeError::UnknownOpcode {
                offset: inst.offset,
                opcode: inst.opcode,
            });
        };

        if name == "EXTENDED_ARG" {
            let arg = inst.arg.ok_or(DecodeError::MissingOperand {
                offset: inst.offset,
                op: name,
            })?;
            pending = Some(match pending {
                Some((start, high, line)) => (start, (high | arg) << 8, line.or(inst.starts_line)),
                None => (inst.offset, arg << 8, inst.starts_line),
            });
            continue;
        }

        let (start, arg, line) = match pending.take() {
            Some((start, high, line)) => {
                let Some(low) = inst.arg else {
                    return Err(DecodeError::DanglingExtendedArg { offset: start });
                };
                (start, Some(high | low), line.or(inst.starts_line))
            }
            None => (inst.offset, inst.arg, inst.starts_line),
        };
        if set.has_arg(inst.opcode) && arg.is_none() {
            return Err(DecodeError::MissingOperand {
                offset: inst.offset,
                op: name,
            });
        }

        out.push(Decoded {
            start,
            offset: inst.offset,
            name,
            arg,
            line,
        });
    }

    if let Some((start, _, _)) = pending {
        return Err(DecodeError::DanglingExtendedArg { offset: start });
    }
    Ok(out)
}
