use pretty_assertions::assert_eq;

use super::*;

fn field(expr: &str) -> Part {
    Part::Field {
        expr: expr.into(),
        conversion: None,
        spec: Vec::new(),
    }
}

#[test]
fn literal_and_fields() {
    let parts = vec![
        Part::Literal("x = ".into()),
        field("x"),
        Part::Literal(" {braces}\n".into()),
    ];
    assert_eq!(render(&parts), "f'x = {x} {{braces}}\\n'");
}

#[test]
fn conversion_and_nested_spec() {
    let parts = vec![Part::Field {
        expr: "value".into(),
        conversion: Some('r'),
        spec: vec![Part::Literal(">".into()), field("width")],
    }];
    assert_eq!(render(&parts), "f'{value!r:>{width}}'");
}

#[test]
fn quote_avoids_field_text() {
    let parts = vec![Part::Literal("k: ".into()), field("d['k']")];
    assert_eq!(render(&parts), "f\"k: {d['k']}\"");

    let both = vec![field("a['x']"), field("b[\"y\"]")];
    assert_eq!(render(&both), "f'''{a['x']}{b[\"y\"]}'''");
}

#[test]
fn apostrophes_in_text_prefer_double_quotes() {
    let parts = vec![Part::Literal("it's ".into()), field("n")];
    assert_eq!(render(&parts), "f\"it's {n}\"");
}

#[test]
fn dict_display_field_gets_a_space() {
    assert_eq!(render(&[field("{1: 2}")]), "f'{ {1: 2}}'");
}
