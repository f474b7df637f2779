//! The assembled grammar for one code object.

use rustc_hash::{FxHashMap, FxHashSet};
use undis_ir::{Token, Variant, Version};

use crate::customize::{customize, CustomizeMap};
use crate::rules::{Delta, PYPY, PYTHON37, PYTHON38};
use crate::{parse_rules, ConfigError, Rule};

/// What kind of code object is being parsed; picks the start symbol.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum CompileMode {
    /// Module, class and function bodies.
    #[default]
    Exec,
    /// A lambda body: one expression.
    Lambda,
    /// A list/set/dict comprehension or generator expression body.
    Comprehension,
}

impl CompileMode {
    pub fn start_symbol(self) -> &'static str {
        match self {
            CompileMode::Exec => "module",
            CompileMode::Lambda => "lambda_start",
            CompileMode::Comprehension => "comp_func",
        }
    }
}

/// Version, runtime and mode a grammar is assembled for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Target {
    pub version: Version,
    pub variant: Variant,
    pub mode: CompileMode,
}

/// Deduplicated rule list plus the customize map.
#[derive(Clone, Debug)]
pub struct Grammar {
    target: Target,
    rules: Vec<Rule>,
    seen: FxHashSet<Rule>,
    customize: CustomizeMap,
}

impl Grammar {
    /// An empty grammar; see [`assemble`] for the real thing.
    pub fn new(target: Target) -> Self {
        Grammar {
            target,
            rules: Vec::new(),
            seen: FxHashSet::default(),
            customize: CustomizeMap::default(),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn start(&self) -> &'static str {
        self.target.mode.start_symbol()
    }

    /// Rules in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn customize(&self) -> &CustomizeMap {
        &self.customize
    }

    pub fn contains(&self, rule: &Rule) -> bool {
        self.seen.contains(rule)
    }

    /// Add a rule unless it is already present. Returns whether it was new.
    pub fn add_rule(&mut self, rule: Rule) -> bool {
        if self.seen.contains(&rule) {
            return false;
        }
        self.seen.insert(rule.clone());
        self.rules.push(rule);
        true
    }

    /// Remove a rule. Returns whether it was present.
    pub fn remove_rule(&mut self, rule: &Rule) -> bool {
        if !self.seen.remove(rule) {
            return false;
        }
        self.rules.retain(|r| r != rule);
        true
    }

    /// Add every rule in `text`; returns how many were new.
    pub fn add_text(&mut self, text: &str) -> Result<usize, ConfigError> {
        let rules = parse_rules(text)?;
        Ok(rules.into_iter().filter(|r| self.add_rule(r.clone())).count())
    }

    /// Remove every rule in `text`; returns how many were present.
    pub fn remove_text(&mut self, text: &str) -> Result<usize, ConfigError> {
        let rules = parse_rules(text)?;
        Ok(rules.iter().filter(|r| self.remove_rule(r)).count())
    }

    fn apply(&mut self, delta: &Delta) -> Result<(), ConfigError> {
        self.remove_text(delta.remove)?;
        self.add_text(delta.add)?;
        Ok(())
    }

    pub(crate) fn record_arity(&mut self, kind: &str, arity: u32) {
        self.customize.record(kind, arity);
    }
}

/// Assemble the grammar for one code object's token stream.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(version = %target.version, variant = %target.variant, mode = ?target.mode)
)]
pub fn assemble(
    target: Target,
    tokens: &[Token],
    arities: &FxHashMap<String, u32>,
) -> Result<Grammar, ConfigError> {
    if !target.version.is_supported() {
        return Err(ConfigError::UnsupportedVersion {
            version: target.version,
            variant: target.variant,
        });
    }

    let mut grammar = Grammar::new(target);
    grammar.add_text(PYTHON37)?;
    if target.version == Version::V3_8 {
        grammar.apply(&PYTHON38)?;
    }
    if target.variant.is_pypy() {
        grammar.apply(&PYPY)?;
    }
    customize(&mut grammar, tokens, arities);

    tracing::debug!(rules = grammar.rules.len(), "grammar assembled");
    Ok(grammar)
}

#[cfg(test)]
mod tests;
