//! Building trees out of a finished (or partly finished) chart.
//!
//! For a symbol over a span, the candidate rules are tried in preference
//! order. For a rule, children are found right to left: child `k` may start
//! at `p` when the item with the dot before it, started at the span's
//! origin, lives in set `p`. The smallest such `p` wins, so the last child
//! is as long as possible. The child right after a `testexpr` is the
//! exception: there the largest `p` wins, so a condition takes in every
//! test that jumps to the same place.
//!
//! A subtree a reduce check accepted is reused as is when the same rule
//! over the same span is derived again.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use undis_grammar::is_collect;
use undis_ir::{Child, Node};
use undis_stack::ensure_sufficient_stack;

use crate::chart::{Chart, Item, RuleId, Sym};

/// Shapes tried first when several rules derive the same span. Rules whose
/// left-hand side is not listed (and that are not a unit rule for a listed
/// symbol) come after all of these.
pub(crate) const PREFERENCE: &[&str] = &[
    "ifelsestmt",
    "ifelsestmtc",
    "whilestmt",
    "while1stmt",
    "forstmt",
    "try_except",
    "ifstmt",
    "continue",
];

/// Derivations already settled.
#[derive(Default)]
pub(crate) struct Memo {
    /// Subtrees by `(symbol, from, to)`.
    spans: FxHashMap<(Sym, u32, u32), Node>,
    /// Subtrees a reduce check accepted, by `(rule, from, to)`.
    accepted: FxHashMap<(RuleId, u32, u32), Node>,
}

impl Memo {
    pub fn accept(&mut self, rule: RuleId, from: u32, to: u32, node: Node) {
        self.accepted.insert((rule, from, to), node);
    }
}

pub(crate) struct Deriver<'c> {
    chart: &'c Chart<'c>,
    memo: &'c mut Memo,
    /// Only spans ending before this set are final enough to remember.
    limit: u32,
    active: FxHashSet<(Sym, u32, u32)>,
}

impl<'c> Deriver<'c> {
    pub fn new(chart: &'c Chart<'c>, memo: &'c mut Memo, limit: u32) -> Self {
        Deriver {
            chart,
            memo,
            limit,
            active: FxHashSet::default(),
        }
    }

    /// Subtree (or token) for `sym` over tokens `from..to`.
    pub fn derive_symbol(&mut self, sym: Sym, from: u32, to: u32) -> Option<Child> {
        let chart = self.chart;
        if !chart.grammar.is_nonterminal(sym) {
            return chart
                .derivable(sym, from, to)
                .then(|| chart.tokens.get(from as usize).cloned().map(Child::Token))
                .flatten();
        }

        let key = (sym, from, to);
        if let Some(done) = self.memo.spans.get(&key) {
            return Some(Child::Node(done.clone()));
        }
        let mut candidates: SmallVec<[RuleId; 4]> = chart
            .sets
            .get(to as usize)?
            .completions(sym, from)
            .iter()
            .copied()
            .collect();
        if candidates.is_empty() || !self.active.insert(key) {
            return None;
        }
        candidates.sort_by_key(|&rule| self.rank(rule));
        let node = candidates
            .into_iter()
            .find_map(|rule| self.derive_rule(rule, from, to));
        self.active.remove(&key);

        let node = node?;
        if to < self.limit && !is_collect(chart.grammar.name(sym)) {
            self.memo.spans.insert(key, node.clone());
        }
        Some(Child::Node(node))
    }

    /// Subtree for one specific rule over `from..to`.
    pub fn derive_rule(&mut self, rule: RuleId, from: u32, to: u32) -> Option<Node> {
        if let Some(node) = self.memo.accepted.get(&(rule, from, to)) {
            return Some(node.clone());
        }
        ensure_sufficient_stack(|| self.derive_rule_inner(rule, from, to))
    }

    fn derive_rule_inner(&mut self, rule: RuleId, from: u32, to: u32) -> Option<Node> {
        let chart = self.chart;
        let compiled = chart.grammar.rule(rule);
        let mut children = Vec::with_capacity(compiled.rhs.len());
        let mut end = to;

        for (dot, &sym) in compiled.rhs.iter().enumerate().rev() {
            let prefix = Item {
                rule,
                dot: u16::try_from(dot).ok()?,
                origin: from,
            };
            let lowest = if chart.grammar.is_nonterminal(sym) {
                from
            } else {
                end.checked_sub(1)?
            };
            let after_test = dot
                .checked_sub(1)
                .and_then(|prev| compiled.rhs.get(prev))
                .is_some_and(|&prev| chart.grammar.name(prev) == "testexpr");
            let mut found = None;
            for p in (lowest..=end).map(|p| if after_test { lowest + end - p } else { p }) {
                if !chart.sets[p as usize].contains(prefix) || !chart.derivable(sym, p, end) {
                    continue;
                }
                if let Some(child) = self.derive_symbol(sym, p, end) {
                    found = Some((p, child));
                    break;
                }
            }
            let (p, child) = found?;
            children.push(child);
            end = p;
        }

        if end != from {
            return None;
        }
        children.reverse();
        Some(build(chart.grammar.name(compiled.lhs), children))
    }

    /// Sort key: preference position, then shorter rules, then grammar order.
    fn rank(&self, rule: RuleId) -> (usize, usize, RuleId) {
        let grammar = &self.chart.grammar;
        let compiled = grammar.rule(rule);
        let position = |sym: Sym| PREFERENCE.iter().position(|&p| p == grammar.name(sym));
        let preference = position(compiled.lhs)
            .or_else(|| match compiled.rhs.as_slice() {
                [only] => position(*only),
                _ => None,
            })
            .unwrap_or(PREFERENCE.len());
        (preference, compiled.rhs.len(), rule)
    }
}

/// Make a node, splicing same-kind children of list-like nonterminals so a
/// list is one node however long it is.
pub(crate) fn build(kind: &str, children: Vec<Child>) -> Node {
    if !is_collect(kind) {
        return Node::new(kind, children);
    }
    let mut flat = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Child::Node(inner) if inner.kind == kind => flat.extend(inner.children),
            other => flat.push(other),
        }
    }
    Node::new(kind, flat)
}

#[cfg(test)]
mod tests;
