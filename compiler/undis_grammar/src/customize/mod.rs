//! Operand-driven rule customization.
//!
//! One pass over the token stream. A coarse prefix test discards most
//! tokens; the rest are deduplicated by kind, so a thousand
//! `CALL_FUNCTION_1` tokens add one rule. Each rule added for an
//! arity-specialized kind records that arity in the [`CustomizeMap`] for the
//! generator.

use rustc_hash::{FxHashMap, FxHashSet};
use undis_ir::Token;

use crate::{Grammar, Rule};

/// Kind -> arity (or flag set) for every kind that shaped a custom rule.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct CustomizeMap {
    arities: FxHashMap<String, u32>,
}

impl CustomizeMap {
    pub fn get(&self, kind: &str) -> Option<u32> {
        self.arities.get(kind).copied()
    }

    pub fn len(&self) -> usize {
        self.arities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arities.is_empty()
    }

    pub(crate) fn record(&mut self, kind: &str, arity: u32) {
        self.arities.insert(kind.to_owned(), arity);
    }
}

const PREFIXES: &[&str] = &["BUILD_", "CALL_", "MAKE_", "UNPACK_"];

/// Code-object loads that `MAKE_FUNCTION` may consume, with the nonterminal
/// built and whether the result is immediately called on an iterable.
const FUNCTION_LOADS: &[(&str, &str, bool)] = &[
    ("LOAD_CODE", "mkfunc", false),
    ("LOAD_LAMBDA", "mklambda", false),
    ("LOAD_LISTCOMP", "listcomp", true),
    ("LOAD_SETCOMP", "setcomp", true),
    ("LOAD_DICTCOMP", "dictcomp", true),
    ("LOAD_GENEXPR", "genexpr", true),
];

/// `MAKE_FUNCTION` flag bits in stack order, and what each pushes.
const FUNCTION_FLAGS: &[(u32, &str)] = &[
    (0x01, "expr"),
    (0x02, "expr"),
    (0x04, "expr"),
    (0x08, "load_closure"),
];

/// Builds that splice iterables or mappings together (`[*a, *b]`,
/// `{**a, **b}`, `f(*a, **b)`), and the nonterminal each one makes.
const UNPACKING: &[(&str, &str)] = &[
    ("BUILD_LIST_UNPACK", "list_unpack"),
    ("BUILD_SET_UNPACK", "set_unpack"),
    ("BUILD_TUPLE_UNPACK", "tuple_unpack"),
    ("BUILD_MAP_UNPACK", "dict_unpack"),
    ("BUILD_TUPLE_UNPACK_WITH_CALL", "unpack_args"),
    ("BUILD_MAP_UNPACK_WITH_CALL", "unpack_kwargs"),
];

fn repeat(sym: &str, n: u32) -> impl Iterator<Item = String> + '_ {
    (0..n).map(move |_| sym.to_owned())
}

/// Builds one rule `lhs ::= parts...`.
struct RuleBuf {
    lhs: &'static str,
    rhs: Vec<String>,
}

impl RuleBuf {
    fn new(lhs: &'static str) -> Self {
        RuleBuf {
            lhs,
            rhs: Vec::new(),
        }
    }

    fn sym(mut self, sym: &str) -> Self {
        self.rhs.push(sym.to_owned());
        self
    }

    fn many(mut self, sym: &str, n: u32) -> Self {
        self.rhs.extend(repeat(sym, n));
        self
    }

    fn build(self) -> Rule {
        Rule::new(self.lhs, self.rhs)
    }
}

/// Add the custom rules for every specialized kind present in `tokens`.
/// Returns the number of rules added.
pub(crate) fn customize(
    grammar: &mut Grammar,
    tokens: &[Token],
    arities: &FxHashMap<String, u32>,
) -> usize {
    let present: FxHashSet<&str> = tokens.iter().map(|t| t.kind.as_str()).collect();
    let mut seen_kinds: FxHashSet<&str> = FxHashSet::default();
    let mut added = 0;

    for tok in tokens {
        let kind = tok.kind.as_str();
        if !PREFIXES.iter().any(|p| kind.starts_with(p)) || !seen_kinds.insert(kind) {
            continue;
        }
        let Some(&n) = arities.get(kind) else {
            continue;
        };

        let rules = rules_for(tok.op, kind, n, &present);
        if rules.is_empty() {
            continue;
        }
        grammar.record_arity(kind, n);
        for rule in rules {
            if grammar.add_rule(rule) {
                added += 1;
            }
        }
    }

    tracing::debug!(added, "customized grammar");
    added
}

fn rules_for(op: &str, kind: &str, n: u32, present: &FxHashSet<&str>) -> Vec<Rule> {
    let mut rules = Vec::new();
    match op {
        "BUILD_LIST" => rules.push(RuleBuf::new("list").many("expr", n).sym(kind).build()),
        "BUILD_SET" => rules.push(RuleBuf::new("set").many("expr", n).sym(kind).build()),
        "BUILD_TUPLE" => {
            rules.push(RuleBuf::new("tuple").many("expr", n).sym(kind).build());
            if present.contains("LOAD_CLOSURE") {
                rules.push(
                    RuleBuf::new("load_closure")
                        .many("LOAD_CLOSURE", n)
                        .sym(kind)
                        .build(),
                );
            }
        }
        "BUILD_MAP" => rules.push(RuleBuf::new("dict").many("expr", 2 * n).sym(kind).build()),
        "BUILD_CONST_KEY_MAP" => rules.push(
            RuleBuf::new("dict_const")
                .many("expr", n)
                .sym("LOAD_CONST")
                .sym(kind)
                .build(),
        ),
        "BUILD_STRING" => rules.push(RuleBuf::new("joined_str").many("expr", n).sym(kind).build()),
        "BUILD_SLICE" => rules.push(RuleBuf::new("slice").many("expr", n).sym(kind).build()),
        "CALL_FUNCTION" => {
            rules.push(RuleBuf::new("call").sym("expr").many("expr", n).sym(kind).build());
            if n >= 2 && present.contains("LOAD_BUILD_CLASS") {
                rules.push(
                    RuleBuf::new("build_class")
                        .sym("LOAD_BUILD_CLASS")
                        .sym("mkfunc")
                        .sym("LOAD_STR")
                        .many("expr", n - 2)
                        .sym(kind)
                        .build(),
                );
            }
        }
        "CALL_FUNCTION_KW" => rules.push(
            RuleBuf::new("call_kw")
                .sym("expr")
                .many("expr", n)
                .sym("LOAD_CONST")
                .sym(kind)
                .build(),
        ),
        "CALL_METHOD" => {
            for lookup in ["LOAD_METHOD", "LOOKUP_METHOD"] {
                if present.contains(lookup) {
                    rules.push(
                        RuleBuf::new("call_method")
                            .sym("expr")
                            .sym(lookup)
                            .many("expr", n)
                            .sym(kind)
                            .build(),
                    );
                }
            }
        }
        "UNPACK_SEQUENCE" => rules.push(RuleBuf::new("unpack").sym(kind).many("store", n).build()),
        "MAKE_FUNCTION" => {
            for &(load, lhs, called) in FUNCTION_LOADS {
                if !present.contains(load) {
                    continue;
                }
                let mut rule = RuleBuf::new(lhs);
                for &(bit, sym) in FUNCTION_FLAGS {
                    if n & bit != 0 {
                        rule = rule.sym(sym);
                    }
                }
                rule = rule.sym(load).sym("LOAD_STR").sym(kind);
                if called {
                    rule = rule.sym("expr").sym("GET_ITER").sym("CALL_FUNCTION_1");
                }
                rules.push(rule.build());
            }
        }
        _ => {
            if let Some(&(_, lhs)) = UNPACKING.iter().find(|(build, _)| *build == op) {
                rules.push(RuleBuf::new(lhs).many("expr", n).sym(kind).build());
            }
        }
    }
    rules
}
