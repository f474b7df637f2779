//! Earley recognizer.
//!
//! Symbols are interned once per grammar. Set `j` holds the items alive after
//! `j` tokens; each set also indexes its items by the symbol after the dot
//! and records every accepted completion as `(lhs, origin) -> rules`, which
//! is all the tree builder needs to walk derivations back out.
//!
//! Nullable nonterminals are handled the Aycock-Horspool way: predicting one
//! also advances over it, so empty completions never race the predictor.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use undis_grammar::Grammar;
use undis_ir::Token;

/// Interned grammar symbol.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct Sym(u32);

pub(crate) type RuleId = u32;

pub(crate) struct CompiledRule {
    pub lhs: Sym,
    pub rhs: SmallVec<[Sym; 6]>,
}

/// A grammar with interned symbols and precomputed nullability.
pub(crate) struct CompiledGrammar<'a> {
    pub source: &'a Grammar,
    names: Vec<&'a str>,
    ids: FxHashMap<&'a str, Sym>,
    pub rules: Vec<CompiledRule>,
    by_lhs: Vec<SmallVec<[RuleId; 4]>>,
    nullable: Vec<bool>,
    pub start: Option<Sym>,
}

impl<'a> CompiledGrammar<'a> {
    pub fn new(source: &'a Grammar) -> Self {
        let mut names: Vec<&'a str> = Vec::new();
        let mut ids: FxHashMap<&'a str, Sym> = FxHashMap::default();
        let mut intern = |name: &'a str| -> Sym {
            *ids.entry(name).or_insert_with(|| {
                names.push(name);
                Sym(u32::try_from(names.len() - 1).unwrap_or(u32::MAX))
            })
        };

        let rules: Vec<CompiledRule> = source
            .rules()
            .iter()
            .map(|rule| CompiledRule {
                lhs: intern(&rule.lhs),
                rhs: rule.rhs.iter().map(|s| intern(s)).collect(),
            })
            .collect();

        let mut by_lhs = vec![SmallVec::new(); names.len()];
        for (id, rule) in (0..).zip(&rules) {
            by_lhs[rule.lhs.0 as usize].push(id);
        }

        let mut nullable = vec![false; names.len()];
        let mut changed = true;
        while changed {
            changed = false;
            for rule in &rules {
                if !nullable[rule.lhs.0 as usize]
                    && rule.rhs.iter().all(|s| nullable[s.0 as usize])
                {
                    nullable[rule.lhs.0 as usize] = true;
                    changed = true;
                }
            }
        }

        let start = ids.get(source.start()).copied();
        CompiledGrammar {
            source,
            names,
            ids,
            rules,
            by_lhs,
            nullable,
            start,
        }
    }

    pub fn name(&self, sym: Sym) -> &'a str {
        self.names[sym.0 as usize]
    }

    pub fn is_nonterminal(&self, sym: Sym) -> bool {
        !self.by_lhs[sym.0 as usize].is_empty()
    }

    pub fn is_nullable(&self, sym: Sym) -> bool {
        self.nullable[sym.0 as usize]
    }

    pub fn rules_for(&self, sym: Sym) -> &[RuleId] {
        &self.by_lhs[sym.0 as usize]
    }

    /// A token kind the grammar knows as a terminal.
    pub fn terminal(&self, kind: &str) -> Option<Sym> {
        self.ids.get(kind).copied().filter(|&s| !self.is_nonterminal(s))
    }

    pub fn rule(&self, id: RuleId) -> &CompiledRule {
        &self.rules[id as usize]
    }

    fn next_symbol(&self, item: Item) -> Option<Sym> {
        self.rule(item.rule).rhs.get(usize::from(item.dot)).copied()
    }
}

/// A dotted rule with the set it started in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct Item {
    pub rule: RuleId,
    pub dot: u16,
    pub origin: u32,
}

impl Item {
    fn advance(self) -> Item {
        Item {
            dot: self.dot + 1,
            ..self
        }
    }
}

#[derive(Default)]
pub(crate) struct ItemSet {
    items: Vec<Item>,
    seen: FxHashSet<Item>,
    waiting: FxHashMap<Sym, SmallVec<[u32; 4]>>,
    completed: FxHashMap<(Sym, u32), SmallVec<[RuleId; 2]>>,
}

impl ItemSet {
    fn add(&mut self, item: Item, next: Option<Sym>) {
        if !self.seen.insert(item) {
            return;
        }
        if let Some(next) = next {
            let index = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
            self.waiting.entry(next).or_default().push(index);
        }
        self.items.push(item);
    }

    pub fn contains(&self, item: Item) -> bool {
        self.seen.contains(&item)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Accepted rules deriving `lhs` from `origin` to this set.
    pub fn completions(&self, lhs: Sym, origin: u32) -> &[RuleId] {
        self.completed
            .get(&(lhs, origin))
            .map_or(&[][..], |rules| rules.as_slice())
    }

    /// Record an accepted completion; true the first time `(lhs, origin)`
    /// completes here.
    fn record(&mut self, lhs: Sym, origin: u32, rule: RuleId) -> bool {
        let rules = self.completed.entry((lhs, origin)).or_default();
        let first = rules.is_empty();
        if !rules.contains(&rule) {
            rules.push(rule);
        }
        first
    }

    fn waiting_on(&self, sym: Sym) -> SmallVec<[Item; 4]> {
        self.waiting
            .get(&sym)
            .map(|indices| indices.iter().map(|&i| self.items[i as usize]).collect())
            .unwrap_or_default()
    }
}

/// Where recognition stopped short.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Stall {
    /// Token `at` is not a terminal of this grammar.
    UnknownKind(usize),
    /// No item can consume token `at`.
    Unexpected(usize),
    /// All tokens consumed without completing the start symbol.
    End,
}

pub(crate) struct Chart<'a> {
    pub grammar: CompiledGrammar<'a>,
    pub tokens: &'a [Token],
    pub sets: Vec<ItemSet>,
    token_syms: Vec<Option<Sym>>,
}

impl<'a> Chart<'a> {
    pub fn new(grammar: CompiledGrammar<'a>, tokens: &'a [Token]) -> Self {
        let token_syms = tokens.iter().map(|t| grammar.terminal(&t.kind)).collect();
        Chart {
            grammar,
            tokens,
            sets: Vec::with_capacity(tokens.len() + 1),
            token_syms,
        }
    }

    /// Terminal symbol of token `at`.
    pub fn token_sym(&self, at: usize) -> Option<Sym> {
        self.token_syms.get(at).copied().flatten()
    }

    /// Can `sym` derive tokens `from..to` according to the chart?
    pub fn derivable(&self, sym: Sym, from: u32, to: u32) -> bool {
        if self.grammar.is_nonterminal(sym) {
            return self
                .sets
                .get(to as usize)
                .is_some_and(|set| !set.completions(sym, from).is_empty());
        }
        to == from + 1 && self.token_sym(from as usize) == Some(sym)
    }

    /// Run the recognizer. `accept(chart, rule, origin, end)` is asked before
    /// every non-empty completion and may veto it.
    pub fn recognize(
        &mut self,
        mut accept: impl FnMut(&Self, RuleId, u32, u32) -> bool,
    ) -> Result<(), Stall> {
        let Some(start) = self.grammar.start else {
            return Err(Stall::End);
        };

        self.sets.push(ItemSet::default());
        for &rule in self.grammar.rules_for(start) {
            let item = Item {
                rule,
                dot: 0,
                origin: 0,
            };
            let next = self.grammar.next_symbol(item);
            self.sets[0].add(item, next);
        }

        for j in 0..=self.tokens.len() {
            self.close(j, &mut accept);

            if j == self.tokens.len() {
                break;
            }
            let Some(sym) = self.token_sym(j) else {
                return Err(Stall::UnknownKind(j));
            };
            let mut next = ItemSet::default();
            for item in self.sets[j].waiting_on(sym) {
                let item = item.advance();
                next.add(item, self.grammar.next_symbol(item));
            }
            if next.items.is_empty() {
                return Err(Stall::Unexpected(j));
            }
            self.sets.push(next);
        }

        let end = self.tokens.len();
        if self.sets[end].completions(start, 0).is_empty() {
            return Err(Stall::End);
        }
        Ok(())
    }

    /// Predict and complete within set `j` until nothing changes.
    fn close(&mut self, j: usize, accept: &mut impl FnMut(&Self, RuleId, u32, u32) -> bool) {
        let end = u32::try_from(j).unwrap_or(u32::MAX);
        let mut k = 0;
        while let Some(&item) = self.sets[j].items.get(k) {
            k += 1;
            match self.grammar.next_symbol(item) {
                Some(next) if self.grammar.is_nonterminal(next) => {
                    for &rule in self.grammar.rules_for(next) {
                        let predicted = Item {
                            rule,
                            dot: 0,
                            origin: end,
                        };
                        let after = self.grammar.next_symbol(predicted);
                        self.sets[j].add(predicted, after);
                    }
                    if self.grammar.is_nullable(next) {
                        let advanced = item.advance();
                        let after = self.grammar.next_symbol(advanced);
                        self.sets[j].add(advanced, after);
                    }
                }
                Some(_) => {}
                None => {
                    let lhs = self.grammar.rule(item.rule).lhs;
                    if item.origin < end && !accept(&*self, item.rule, item.origin, end) {
                        continue;
                    }
                    if !self.sets[j].record(lhs, item.origin, item.rule) {
                        continue;
                    }
                    for parent in self.sets[item.origin as usize].waiting_on(lhs) {
                        let advanced = parent.advance();
                        let after = self.grammar.next_symbol(advanced);
                        self.sets[j].add(advanced, after);
                    }
                }
            }
        }
    }

    /// Token kinds some live item in set `j` could consume next. Lowercase
    /// names that merely have no rules in this grammar are not token kinds.
    pub fn expected(&self, j: usize) -> Vec<&'a str> {
        let Some(set) = self.sets.get(j) else {
            return Vec::new();
        };
        let mut names: Vec<&'a str> = set
            .items()
            .iter()
            .filter_map(|&item| self.grammar.next_symbol(item))
            .filter(|&sym| !self.grammar.is_nonterminal(sym))
            .map(|sym| self.grammar.name(sym))
            .filter(|name| name.starts_with(|c: char| c.is_ascii_uppercase()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
