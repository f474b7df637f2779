//! Configuration errors.

use undis_diagnostic::{Diagnostic, ErrorCode};
use undis_ir::{Variant, Version};

/// The grammar cannot be built for this code object.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported bytecode version {version} ({variant})")]
    UnsupportedVersion { version: Version, variant: Variant },

    #[error("malformed grammar rule `{text}`: {reason}")]
    MalformedRule { text: String, reason: &'static str },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::UnsupportedVersion { .. } => ErrorCode::E2001,
            ConfigError::MalformedRule { .. } => ErrorCode::E2002,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            ConfigError::UnsupportedVersion { .. } => {
                diag.with_note(format!("supported versions: {}", supported_list()))
            }
            ConfigError::MalformedRule { .. } => diag,
        }
    }
}

fn supported_list() -> String {
    Version::SUPPORTED
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests;
