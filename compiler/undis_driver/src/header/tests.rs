use std::sync::Arc;

use pretty_assertions::assert_eq;
use undis_ir::{CodeObject, Variant, Version};

use super::*;

fn artifact() -> Artifact {
    Artifact {
        version: Version::V3_8,
        variant: Variant::PyPy,
        filename: None,
        timestamp: None,
        source_size: None,
        code: Arc::new(CodeObject::default()),
    }
}

#[test]
fn minimal_header_names_engine_and_bytecode() {
    let text = header(&artifact());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("# undis "));
    assert_eq!(lines[1], "# Python bytecode 3.8 (PyPy)");
}

#[test]
fn optional_lines_follow_in_order() {
    let text = header(&Artifact {
        filename: Some("pkg/mod.py".into()),
        timestamp: Some(1_560_000_000),
        source_size: Some(812),
        ..artifact()
    });
    let lines: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(
        lines,
        vec![
            "# Source: pkg/mod.py",
            "# Compiled at: 2019-06-08 13:20:00 UTC",
            "# Size of source mod 2**32: 812 bytes",
        ]
    );
}

#[test]
fn timestamps_cross_leap_days() {
    assert_eq!(utc_timestamp(0).as_deref(), Some("1970-01-01 00:00:00 UTC"));
    assert_eq!(utc_timestamp(951_782_400).as_deref(), Some("2000-02-29 00:00:00 UTC"));
    assert_eq!(utc_timestamp(951_868_799).as_deref(), Some("2000-02-29 23:59:59 UTC"));
}

#[test]
fn timestamps_past_the_calendar_are_left_out() {
    assert_eq!(utc_timestamp(u64::MAX), None);
    let text = header(&Artifact {
        timestamp: Some(u64::MAX),
        ..artifact()
    });
    assert!(!text.contains("Compiled at"));
}
