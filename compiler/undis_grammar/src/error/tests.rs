use pretty_assertions::assert_eq;

use super::*;

#[test]
fn unsupported_version_lists_the_supported_ones() {
    let err = ConfigError::UnsupportedVersion {
        version: Version::new(3, 9),
        variant: Variant::CPython,
    };
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(
        err.to_diagnostic().to_string(),
        "error[E2001]: unsupported bytecode version 3.9 (CPython)\n  = note: supported versions: 3.7, 3.8"
    );
}
