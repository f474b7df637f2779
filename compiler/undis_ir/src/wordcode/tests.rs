use pretty_assertions::assert_eq;

use super::*;
use crate::{Variant, Version};

fn set() -> InstructionSet {
    match InstructionSet::for_target(Version::V3_8, Variant::CPython) {
        Some(set) => set,
        None => panic!("3.8 must be supported"),
    }
}

#[test]
fn splits_pairs_and_drops_operands_below_have_argument() {
    // LOAD_CONST 0; RETURN_VALUE (operand byte junk)
    let insts = decode_wordcode(&set(), &[100, 0, 83, 7], &[(0, 1)]);
    assert_eq!(
        insts,
        Ok(vec![
            RawInstruction::new(0, 100, Some(0)).with_line(1),
            RawInstruction::new(2, 83, None),
        ])
    );
}

#[test]
fn odd_length_is_truncated() {
    let err = decode_wordcode(&set(), &[100, 0, 83], &[]);
    assert_eq!(err, Err(WordcodeError::Truncated { len: 3 }));
    assert_eq!(WordcodeError::Truncated { len: 3 }.code(), ErrorCode::E1006);
}

#[test]
fn unknown_opcode_is_reported_with_offset() {
    // 120 is SETUP_LOOP, gone in 3.8
    let err = decode_wordcode(&set(), &[9, 0, 120, 4], &[]);
    assert_eq!(
        err,
        Err(WordcodeError::UnknownOpcode {
            offset: 2,
            opcode: 120
        })
    );
}
