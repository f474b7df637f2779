//! Grammar rules and their text form.
//!
//! ```text
//! # comment
//! ifstmt ::= testexpr stmts come_froms
//! come_froms ::=
//! ```
//!
//! A rule with nothing after `::=` derives the empty string.

use std::fmt;

use smallvec::SmallVec;

use crate::ConfigError;

/// `lhs ::= rhs...`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Rule {
    pub lhs: String,
    pub rhs: SmallVec<[String; 6]>,
}

impl Rule {
    pub fn new<S: Into<String>>(lhs: impl Into<String>, rhs: impl IntoIterator<Item = S>) -> Self {
        Rule {
            lhs: lhs.into(),
            rhs: rhs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ::=", self.lhs)?;
        for sym in &self.rhs {
            write!(f, " {sym}")?;
        }
        Ok(())
    }
}

fn is_symbol(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn malformed(text: &str, reason: &'static str) -> ConfigError {
    ConfigError::MalformedRule {
        text: text.trim().to_owned(),
        reason,
    }
}

/// Parse rule text, one rule per line. Blank lines and `#` comments are
/// skipped.
pub fn parse_rules(text: &str) -> Result<Vec<Rule>, ConfigError> {
    let mut rules = Vec::new();
    for line in text.lines() {
        let body = line.split_once('#').map_or(line, |(body, _)| body).trim();
        if body.is_empty() {
            continue;
        }
        let (lhs, rhs) = body
            .split_once("::=")
            .ok_or_else(|| malformed(line, "missing `::=`"))?;
        let lhs = lhs.trim();
        if lhs.is_empty() {
            return Err(malformed(line, "empty left-hand side"));
        }
        if !is_symbol(lhs) {
            return Err(malformed(line, "left-hand side must be one symbol"));
        }
        let rhs: SmallVec<[String; 6]> = rhs.split_whitespace().map(str::to_owned).collect();
        if !rhs.iter().all(|s| is_symbol(s)) {
            return Err(malformed(line, "symbols are letters, digits and `_`"));
        }
        rules.push(Rule {
            lhs: lhs.to_owned(),
            rhs,
        });
    }
    Ok(rules)
}
