//! Constants from `co_consts` and their canonical source spelling.
//!
//! The original spelling of a literal never survives compilation, so the
//! generator prints the canonical form: the one Python's own `repr` would
//! choose, with the quote character picked so that it does not collide with
//! the value's content.

use std::fmt::Write;
use std::sync::Arc;

use crate::CodeObject;

/// A value from a code object's constant table.
#[derive(Clone, PartialEq, Debug)]
pub enum Constant {
    None,
    Ellipsis,
    Bool(bool),
    Int(i64),
    /// Integer too large for `i64`, as decimal text (sign included).
    BigInt(String),
    Float(f64),
    Complex { real: f64, imag: f64 },
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Constant>),
    FrozenSet(Vec<Constant>),
    Code(Arc<CodeObject>),
}

impl Constant {
    pub fn is_none(&self) -> bool {
        matches!(self, Constant::None)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Constant::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&Arc<CodeObject>> {
        match self {
            Constant::Code(code) => Some(code),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Constant]> {
        match self {
            Constant::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Numbers that print with a leading minus sign.
    ///
    /// These bind like a unary minus, so `(-1).real` and `(-2) ** 2` need
    /// parentheses that a positive literal would not.
    pub fn is_negative_number(&self) -> bool {
        match self {
            Constant::Int(v) => *v < 0,
            Constant::BigInt(text) => text.starts_with('-'),
            Constant::Float(v) => v.is_sign_negative() && !v.is_nan(),
            _ => false,
        }
    }

    /// Canonical source spelling.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        self.write_repr(&mut out);
        out
    }

    fn write_repr(&self, out: &mut String) {
        match self {
            Constant::None => out.push_str("None"),
            Constant::Ellipsis => out.push_str("..."),
            Constant::Bool(true) => out.push_str("True"),
            Constant::Bool(false) => out.push_str("False"),
            Constant::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Constant::BigInt(text) => out.push_str(text),
            Constant::Float(v) => out.push_str(&float_literal(*v)),
            Constant::Complex { real, imag } => out.push_str(&complex_repr(*real, *imag)),
            Constant::Str(s) => out.push_str(&str_repr(s)),
            Constant::Bytes(bytes) => out.push_str(&bytes_repr(bytes)),
            Constant::Tuple(items) => {
                out.push('(');
                write_items(out, items);
                if items.len() == 1 {
                    out.push(',');
                }
                out.push(')');
            }
            Constant::FrozenSet(items) => {
                if items.is_empty() {
                    out.push_str("frozenset()");
                } else {
                    out.push_str("frozenset({");
                    write_items(out, items);
                    out.push_str("})");
                }
            }
            Constant::Code(code) => {
                let _ = write!(out, "<code object {}>", code.name);
            }
        }
    }
}

fn write_items(out: &mut String, items: &[Constant]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.write_repr(out);
    }
}

/// Pick the quote that needs no escaping: `'` unless the text has a `'` and
/// no `"`.
fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double {
        '"'
    } else {
        '\''
    }
}

/// `repr()` of a `str`.
pub(crate) fn str_repr(s: &str) -> String {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = u32::from(c);
                let _ = if code < 0x100 {
                    write!(out, "\\x{code:02x}")
                } else if code < 0x1_0000 {
                    write!(out, "\\u{code:04x}")
                } else {
                    write!(out, "\\U{code:08x}")
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// `repr()` of a `bytes`.
fn bytes_repr(bytes: &[u8]) -> String {
    let quote = pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'));
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push('b');
    out.push(quote);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if char::from(b) == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(char::from(b)),
            b => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out.push(quote);
    out
}

/// Float spelling that re-reads as the same value.
///
/// Follows `repr(float)`: shortest round-tripping digits, fixed notation for
/// decimal exponents in `-4..16`, scientific otherwise. Non-finite values
/// have no literal form and print as a `float(...)` call.
fn float_literal(v: f64) -> String {
    if v.is_nan() {
        return "float('nan')".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 {
            "float('inf')".to_string()
        } else {
            "-float('inf')".to_string()
        };
    }
    let text = shortest_float(v);
    if text.contains(['.', 'e', 'n', 'i']) {
        text
    } else {
        text + ".0"
    }
}

/// `repr` digits without the forced `.0`, shared by complex parts.
fn shortest_float(v: f64) -> String {
    // `{:e}` gives the shortest round-trip digits as `d.ddde<exp>`.
    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if (-4..16).contains(&exp) {
        let point = exp + 1;
        let mut out = String::from(sign);
        if point <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(point.unsigned_abs() as usize));
            out.push_str(&digits);
        } else {
            let point = point as usize;
            if digits.len() <= point {
                out.push_str(&digits);
                out.extend(std::iter::repeat('0').take(point - digits.len()));
            } else {
                out.push_str(&digits[..point]);
                out.push('.');
                out.push_str(&digits[point..]);
            }
        }
        out
    } else {
        let mut out = String::from(sign);
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let exp_sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(out, "e{exp_sign}{:02}", exp.unsigned_abs());
        out
    }
}

fn complex_repr(real: f64, imag: f64) -> String {
    let imag_text = if imag.is_finite() {
        shortest_float(imag)
    } else {
        float_literal(imag)
    };
    if real == 0.0 && real.is_sign_positive() {
        return format!("{imag_text}j");
    }
    let real_text = shortest_float(real);
    if imag_text.starts_with('-') {
        format!("({real_text}{imag_text}j)")
    } else {
        format!("({real_text}+{imag_text}j)")
    }
}

#[cfg(test)]
mod tests;
