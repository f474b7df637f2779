//! Provenance header printed above each decompiled object.

use std::fmt::Write;

use time::macros::format_description;
use time::OffsetDateTime;
use undis_ir::Artifact;

/// Seconds since the epoch as `YYYY-MM-DD HH:MM:SS UTC`; `None` past what
/// a calendar date can hold.
pub(crate) fn utc_timestamp(seconds: u64) -> Option<String> {
    let at = OffsetDateTime::from_unix_timestamp(i64::try_from(seconds).ok()?).ok()?;
    let text = at
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .ok()?;
    Some(format!("{text} UTC"))
}

/// Comment lines identifying the engine and the artifact.
pub fn header(artifact: &Artifact) -> String {
    let mut out = String::with_capacity(128);
    // Writing to a String cannot fail.
    let _ = writeln!(out, "# undis {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(
        out,
        "# Python bytecode {} ({})",
        artifact.version, artifact.variant
    );
    if let Some(filename) = &artifact.filename {
        let _ = writeln!(out, "# Source: {filename}");
    }
    if let Some(stamp) = artifact.timestamp.and_then(utc_timestamp) {
        let _ = writeln!(out, "# Compiled at: {stamp}");
    }
    if let Some(size) = artifact.source_size {
        let _ = writeln!(out, "# Size of source mod 2**32: {size} bytes");
    }
    out
}

#[cfg(test)]
mod tests;
