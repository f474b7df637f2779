//! Parse errors.

use std::fmt::Write;

use undis_diagnostic::{Diagnostic, ErrorCode};
use undis_ir::Offset;

/// No derivation exists for the token stream.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ParseError {
    /// No live item can consume the token at `offset`.
    #[error("unexpected `{kind}` at offset {offset}")]
    UnexpectedToken {
        offset: Offset,
        kind: String,
        /// Terminals that would have been accepted here.
        expected: Vec<String>,
        /// Disassembly lines around the failure, when requested.
        context: Vec<String>,
    },

    /// The tokens ran out before the start symbol was complete.
    #[error("unexpected end of instructions")]
    UnexpectedEnd {
        expected: Vec<String>,
        context: Vec<String>,
    },
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::UnexpectedToken { .. } => ErrorCode::E3001,
            ParseError::UnexpectedEnd { .. } => ErrorCode::E3002,
        }
    }

    /// Offset of the offending token; `None` at the end of the code.
    pub fn offset(&self) -> Option<Offset> {
        match self {
            ParseError::UnexpectedToken { offset, .. } => Some(*offset),
            ParseError::UnexpectedEnd { .. } => None,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let (expected, context) = match self {
            ParseError::UnexpectedToken {
                expected, context, ..
            }
            | ParseError::UnexpectedEnd { expected, context } => (expected, context),
        };
        let mut diag = Diagnostic::error(self.code()).with_message(self.to_string());
        if !expected.is_empty() {
            diag = diag.with_note(format!("expected one of: {}", expected.join(", ")));
        }
        if !context.is_empty() {
            let mut listing = String::from("instructions:");
            for line in context {
                let _ = write!(listing, "\n{line}");
            }
            diag = diag.with_note(listing);
        }
        diag
    }
}
