//! Diagnostics for the decompiler pipeline.
//!
//! Every stage reports failures through its own error type; each of those
//! converts into a [`Diagnostic`] carrying an [`ErrorCode`] whose first digit
//! names the stage that failed:
//!
//! - E1xxx: token synthesis (malformed instruction stream)
//! - E2xxx: grammar assembly (unsupported version or variant)
//! - E3xxx: parsing (no derivation for the token stream)
//! - E9xxx: internal errors (template/tree mismatch; always a defect)
//!
//! Batch tooling keys on [`ErrorCode::is_internal`] to tell bugs apart from
//! ordinary "this object could not be decompiled" skips.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::{ErrorCode, Stage};
