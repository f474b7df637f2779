//! The one error a failing code object produces.

use undis_diagnostic::{Diagnostic, ErrorCode};
use undis_gen::InternalError;
use undis_grammar::ConfigError;
use undis_parse::ParseError;
use undis_scan::DecodeError;

/// A decompilation failure. Exactly one stage reports it; none of them is
/// retried or recovered from.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum DecompileError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl DecompileError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DecompileError::Decode(e) => e.code(),
            DecompileError::Config(e) => e.code(),
            DecompileError::Parse(e) => e.code(),
            DecompileError::Internal(e) => e.code(),
        }
    }

    /// A defect in the decompiler rather than something wrong with the
    /// input. Batch callers count these separately.
    pub fn is_internal(&self) -> bool {
        matches!(self, DecompileError::Internal(_))
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DecompileError::Decode(e) => e.to_diagnostic(),
            DecompileError::Config(e) => e.to_diagnostic(),
            DecompileError::Parse(e) => e.to_diagnostic(),
            DecompileError::Internal(e) => e.to_diagnostic(),
        }
    }
}
