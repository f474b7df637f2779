//! f-string assembly.
//!
//! The walker renders each replacement field's expression; this module
//! picks a quote that none of those expressions use and escapes the literal
//! text around them.

use std::fmt::Write;

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) enum Part {
    Literal(String),
    Field {
        expr: String,
        /// `s`, `r` or `a`.
        conversion: Option<char>,
        spec: Vec<Part>,
    },
}

const QUOTES: &[&str] = &["'", "\"", "'''", "\"\"\""];

fn field_texts<'p>(parts: &'p [Part], out: &mut Vec<&'p str>) {
    for part in parts {
        if let Part::Field { expr, spec, .. } = part {
            out.push(expr);
            field_texts(spec, out);
        }
    }
}

fn literal_texts<'p>(parts: &'p [Part], out: &mut Vec<&'p str>) {
    for part in parts {
        match part {
            Part::Literal(text) => out.push(text),
            Part::Field { spec, .. } => literal_texts(spec, out),
        }
    }
}

/// First quote no field expression contains, preferring `"` only when the
/// literal text has a `'` and no `"`.
fn pick_quote(parts: &[Part]) -> &'static str {
    let mut fields = Vec::new();
    field_texts(parts, &mut fields);
    let mut literals = Vec::new();
    literal_texts(parts, &mut literals);
    let single = literals.iter().any(|t| t.contains('\''));
    let double = literals.iter().any(|t| t.contains('"'));
    let preferred = if single && !double { 1 } else { 0 };
    let usable = |quote: &&&str| !fields.iter().any(|f| f.contains(**quote));
    QUOTES
        .get(preferred)
        .filter(usable)
        .or_else(|| QUOTES.iter().find(usable))
        .copied()
        .unwrap_or("'")
}

fn escape_literal(text: &str, quote: char, out: &mut String) {
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            }
            c => out.push(c),
        }
    }
}

fn write_parts(parts: &[Part], quote: char, out: &mut String) {
    for part in parts {
        match part {
            Part::Literal(text) => escape_literal(text, quote, out),
            Part::Field {
                expr,
                conversion,
                spec,
            } => {
                out.push('{');
                // `{{` would read as an escaped brace.
                if expr.starts_with('{') {
                    out.push(' ');
                }
                out.push_str(expr);
                if let Some(conversion) = conversion {
                    out.push('!');
                    out.push(*conversion);
                }
                if !spec.is_empty() {
                    out.push(':');
                    write_parts(spec, quote, out);
                }
                out.push('}');
            }
        }
    }
}

/// `f'...'` source for `parts`.
pub(crate) fn render(parts: &[Part]) -> String {
    let quote = pick_quote(parts);
    let mut out = String::from("f");
    out.push_str(quote);
    write_parts(parts, quote.chars().next().unwrap_or('\''), &mut out);
    out.push_str(quote);
    out
}

#[cfg(test)]
mod tests;
