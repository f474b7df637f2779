use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

#[test]
fn strings_pick_the_non_colliding_quote() {
    assert_eq!(Constant::Str("plain".into()).repr(), "'plain'");
    assert_eq!(Constant::Str("it's".into()).repr(), "\"it's\"");
    assert_eq!(Constant::Str("say \"hi\"".into()).repr(), "'say \"hi\"'");
    assert_eq!(Constant::Str("both ' and \"".into()).repr(), "'both \\' and \"'");
}

#[test]
fn strings_escape_control_characters() {
    assert_eq!(Constant::Str("a\nb\tc\\".into()).repr(), "'a\\nb\\tc\\\\'");
    assert_eq!(Constant::Str("\u{1}".into()).repr(), "'\\x01'");
    assert_eq!(Constant::Str("caf\u{e9}".into()).repr(), "'caf\u{e9}'");
}

#[test]
fn bytes_escape_non_ascii() {
    assert_eq!(Constant::Bytes(b"ab\xff".to_vec()).repr(), "b'ab\\xff'");
    assert_eq!(Constant::Bytes(b"it's".to_vec()).repr(), "b\"it's\"");
}

#[test]
fn floats_follow_python_repr() {
    assert_eq!(Constant::Float(1.0).repr(), "1.0");
    assert_eq!(Constant::Float(0.1).repr(), "0.1");
    assert_eq!(Constant::Float(-2.5).repr(), "-2.5");
    assert_eq!(Constant::Float(1e16).repr(), "1e+16");
    assert_eq!(Constant::Float(1e15).repr(), "1000000000000000.0");
    assert_eq!(Constant::Float(0.0001).repr(), "0.0001");
    assert_eq!(Constant::Float(0.00001).repr(), "1e-05");
    assert_eq!(Constant::Float(1.5e-10).repr(), "1.5e-10");
    assert_eq!(Constant::Float(f64::INFINITY).repr(), "float('inf')");
}

#[test]
fn complex_numbers() {
    assert_eq!(Constant::Complex { real: 0.0, imag: 1.0 }.repr(), "1j");
    assert_eq!(Constant::Complex { real: 1.0, imag: 2.0 }.repr(), "(1+2j)");
    assert_eq!(Constant::Complex { real: 1.0, imag: -0.5 }.repr(), "(1-0.5j)");
}

#[test]
fn containers() {
    let one = Constant::Tuple(vec![Constant::Int(1)]);
    assert_eq!(one.repr(), "(1,)");
    let pair = Constant::Tuple(vec![Constant::Str("a".into()), Constant::None]);
    assert_eq!(pair.repr(), "('a', None)");
    assert_eq!(Constant::Tuple(Vec::new()).repr(), "()");
    assert_eq!(Constant::FrozenSet(Vec::new()).repr(), "frozenset()");
    assert_eq!(
        Constant::FrozenSet(vec![Constant::Int(1), Constant::Int(2)]).repr(),
        "frozenset({1, 2})"
    );
}

#[test]
fn negative_numbers_are_flagged() {
    assert!(Constant::Int(-1).is_negative_number());
    assert!(Constant::Float(-0.0).is_negative_number());
    assert!(!Constant::Int(3).is_negative_number());
    assert!(!Constant::Str("-1".into()).is_negative_number());
}

proptest! {
    #[test]
    fn float_repr_reads_back_exactly(v in proptest::num::f64::NORMAL) {
        let text = Constant::Float(v).repr();
        let parsed: f64 = text.parse().unwrap_or(f64::NAN);
        prop_assert_eq!(parsed, v, "{}", text);
    }

    #[test]
    fn str_repr_is_quoted(s in ".*") {
        let text = Constant::Str(s).repr();
        prop_assert!(text.starts_with('\'') || text.starts_with('"'));
        prop_assert_eq!(text.chars().next(), text.chars().last());
    }
}
