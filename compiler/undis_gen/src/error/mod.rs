//! Internal errors: a tree the templates cannot render.
//!
//! These never describe bad input. A parse that succeeded always yields a
//! tree the generator should handle, so every variant is a defect.

use undis_diagnostic::{Diagnostic, ErrorCode};

#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum InternalError {
    /// No template or handler for a node kind.
    #[error("no template for `{kind}`")]
    MissingTemplate { kind: String },

    /// A template in the table does not parse.
    #[error("malformed template for `{kind}`: {template:?}")]
    MalformedTemplate { kind: String, template: String },

    /// A template references a child past the end of the node.
    #[error("`{kind}` has {len} children, template wants child {index}")]
    ChildOutOfRange {
        kind: String,
        index: usize,
        len: usize,
    },

    /// A handler found a node laid out differently than its rules produce.
    #[error("`{kind}` does not have the expected shape: {expected}")]
    ShapeMismatch { kind: String, expected: &'static str },
}

impl InternalError {
    pub fn code(&self) -> ErrorCode {
        match self {
            InternalError::MissingTemplate { .. } | InternalError::MalformedTemplate { .. } => {
                ErrorCode::E9001
            }
            InternalError::ChildOutOfRange { .. } => ErrorCode::E9002,
            InternalError::ShapeMismatch { .. } => ErrorCode::E9003,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_note("this is a bug in the decompiler, not in the input")
    }

    pub(crate) fn shape(kind: &str, expected: &'static str) -> Self {
        InternalError::ShapeMismatch {
            kind: kind.to_owned(),
            expected,
        }
    }
}
