//! Undis IR - shared data types for the decompiler pipeline
//!
//! This crate holds everything the stages pass between each other:
//! - The artifact-reader tuple: [`Artifact`], [`CodeObject`], [`Constant`],
//!   [`RawInstruction`]
//! - Version and runtime tags: [`Version`], [`Variant`]
//! - The instruction-set table: [`InstructionSet`]
//! - Synthesized tokens: [`Token`], [`Offset`], [`Attr`]
//! - Parse trees: [`Node`], [`Child`]
//!
//! # Ownership
//!
//! Every value is created fresh per code object and dropped when that object's
//! text is produced. Code objects nested as constants are shared through `Arc`
//! so tokens can carry them without copying the whole body.

mod code;
mod constant;
mod opcode;
mod token;
mod tree;
mod version;
mod wordcode;

pub use code::{Artifact, CodeFlags, CodeObject, RawInstruction};
pub use constant::Constant;
pub use opcode::{InstructionSet, JumpKind, HAVE_ARGUMENT};
pub use token::{Attr, Offset, Token};
pub use tree::{Child, Node};
pub use version::{Version, Variant};
pub use wordcode::{decode_wordcode, WordcodeError};
