//! Error codes for all decompiler diagnostics.

use std::fmt;

/// Pipeline stage an error code belongs to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Stage {
    Decode,
    Configuration,
    Parse,
    Internal,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Decode => write!(f, "decode"),
            Stage::Configuration => write!(f, "configuration"),
            Stage::Parse => write!(f, "parse"),
            Stage::Internal => write!(f, "internal"),
        }
    }
}

/// Error codes for all decompiler diagnostics.
///
/// Format: E#### where the first digit is the stage (see crate docs).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Decode Errors (E1xxx)
    /// Opcode number not present in the instruction-set table
    E1001,
    /// `EXTENDED_ARG` prefix not followed by an instruction
    E1002,
    /// Operand indexes past the end of a constant or name table
    E1003,
    /// Jump target outside the code object
    E1004,
    /// Instruction offsets not strictly increasing
    E1005,
    /// Truncated wordcode
    E1006,

    // Configuration Errors (E2xxx)
    /// Unsupported bytecode version
    E2001,
    /// Malformed grammar rule text
    E2002,

    // Parse Errors (E3xxx)
    /// No derivation accepts the token at this offset
    E3001,
    /// Token stream ended before a complete derivation
    E3002,

    // Internal Errors (E9xxx)
    /// Missing template for a node kind
    E9001,
    /// Template references a child that does not exist
    E9002,
    /// Node shape does not match what its handler expects
    E9003,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E1005,
        ErrorCode::E1006,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E9001,
        ErrorCode::E9002,
        ErrorCode::E9003,
    ];

    /// Get the code as a string (e.g., "E3001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
            ErrorCode::E9003 => "E9003",
        }
    }

    /// Stage that raises this code.
    pub fn stage(&self) -> Stage {
        match self {
            ErrorCode::E1001
            | ErrorCode::E1002
            | ErrorCode::E1003
            | ErrorCode::E1004
            | ErrorCode::E1005
            | ErrorCode::E1006 => Stage::Decode,
            ErrorCode::E2001 | ErrorCode::E2002 => Stage::Configuration,
            ErrorCode::E3001 | ErrorCode::E3002 => Stage::Parse,
            ErrorCode::E9001 | ErrorCode::E9002 | ErrorCode::E9003 => Stage::Internal,
        }
    }

    /// Check if this is an internal error (E9xxx range).
    pub fn is_internal(&self) -> bool {
        self.stage() == Stage::Internal
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E3001"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or(())
    }
}
