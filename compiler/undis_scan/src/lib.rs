//! Token synthesizer.
//!
//! Turns the raw instruction records of one code object into the token
//! stream the grammar is written against:
//!
//! - `EXTENDED_ARG` prefixes fold into the instruction they extend, which
//!   keeps the prefix's byte offset as the start of its composite [`Offset`].
//! - Every forward jump target gets a join marker (`COME_FROM`, or
//!   `COME_FROM_LOOP`/`COME_FROM_EXCEPT`/`COME_FROM_FINALLY` for block setups)
//!   in front of it, one per incoming jump.
//! - Operand-dependent opcodes carry their arity in the kind
//!   (`CALL_FUNCTION_2`, `BUILD_LIST_3`, `MAKE_FUNCTION_8`), and a handful are
//!   renamed by context (`JUMP_BACK`, `LOAD_ASSERT`, `RETURN_LAST`,
//!   `LOAD_STR`, `LOAD_LISTCOMP`, ...).
//! - Long runs of constant pushes feeding one container build are folded into
//!   a `COLLECTION_START`, `ADD_VALUE`... region.
//!
//! [`Offset`]: undis_ir::Offset

mod error;
mod scanner;

pub use error::DecodeError;
pub use scanner::{scan, ScanConfig, ScanOutput};
