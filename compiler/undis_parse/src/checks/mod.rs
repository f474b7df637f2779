//! Reduce checks.
//!
//! Some nonterminals are ambiguous on grammar alone: the same run of tokens
//! is an `if` or the head of a `while`, one `if`/`else` or two `if`s. For
//! those, every reduction is shown to a check before it is recorded. A check
//! sees the rule, the tokens of the span, the one token after it, and (built
//! on first use) the subtree the reduction would produce. Offsets outside
//! that window are never consulted.
//!
//! On top of its own check, every checked nonterminal only accepts join
//! markers whose jump starts inside the span: a marker left by an outer
//! construct's jump belongs to that outer construct.

mod control;
mod expr;

use std::cell::{OnceCell, RefCell};

use undis_grammar::Rule;
use undis_ir::{Child, InstructionSet, Node, Token};

use crate::chart::{Chart, RuleId};
use crate::derive::{Deriver, Memo};

/// Everything a check may look at for one candidate reduction.
pub(crate) struct ReduceContext<'a> {
    rule: &'a Rule,
    span: &'a [Token],
    lookahead: Option<&'a Token>,
    set: &'a InstructionSet,
    candidate: (RuleId, u32, u32),
    deriver: RefCell<Deriver<'a>>,
    node: OnceCell<Option<Node>>,
}

impl<'a> ReduceContext<'a> {
    pub fn new(
        chart: &'a Chart<'a>,
        memo: &'a mut Memo,
        set: &'a InstructionSet,
        rule: RuleId,
        from: u32,
        to: u32,
    ) -> Option<Self> {
        let span = chart.tokens.get(from as usize..to as usize)?;
        Some(ReduceContext {
            rule: chart.grammar.source.rules().get(rule as usize)?,
            span,
            lookahead: chart.tokens.get(to as usize),
            set,
            candidate: (rule, from, to),
            deriver: RefCell::new(Deriver::new(chart, memo, to)),
            node: OnceCell::new(),
        })
    }

    pub fn rule(&self) -> &Rule {
        self.rule
    }

    pub fn tokens(&self) -> &[Token] {
        self.span
    }

    pub fn set(&self) -> &InstructionSet {
        self.set
    }

    /// Address of the first token in the span.
    pub fn first_addr(&self) -> u32 {
        self.span.first().map_or(0, Token::addr)
    }

    /// Address of the token right after the span; `None` at the end of the
    /// code.
    pub fn end_addr(&self) -> Option<u32> {
        self.lookahead.map(Token::addr)
    }

    /// The token right after the span.
    pub fn lookahead(&self) -> Option<&Token> {
        self.lookahead
    }

    /// The instruction (not a join marker) at `addr`, if it is in the span.
    pub fn instruction_at(&self, addr: u32) -> Option<&Token> {
        self.span.iter().find(|t| !t.is_join() && t.addr() == addr)
    }

    /// Subtree this reduction would produce.
    pub fn node(&self) -> Option<&Node> {
        self.node
            .get_or_init(|| {
                let (rule, from, to) = self.candidate;
                self.deriver.borrow_mut().derive_rule(rule, from, to)
            })
            .as_ref()
    }

    /// The subtree, once the check is done with it.
    pub fn into_node(self) -> Option<Node> {
        self.node.into_inner().flatten()
    }
}

pub(crate) type ReduceCheck = fn(&ReduceContext<'_>) -> bool;

/// The check for `lhs`, or `None` when reductions to it are never checked.
pub(crate) fn check_for(lhs: &str) -> Option<ReduceCheck> {
    let check: ReduceCheck = match lhs {
        "ifstmt" => control::ifstmt,
        "ifelsestmt" => control::ifelsestmt,
        "ifelsestmtc" => control::ifelsestmtc,
        "whilestmt" => control::whilestmt,
        "while1stmt" => control::while1stmt,
        "forstmt" => control::forstmt,
        "testfalse" => expr::testfalse,
        "and" | "or" => expr::and_or,
        "if_exp" => expr::if_exp,
        "try_except" | "except_handler" | "ifstmt_debug" => local_only,
        _ => return None,
    };
    Some(check)
}

/// Join locality plus the nonterminal's own check.
pub(crate) fn run(check: ReduceCheck, ctx: &ReduceContext<'_>) -> bool {
    let Some(node) = ctx.node() else {
        return false;
    };
    let first = ctx.first_addr();
    own_joins(node)
        .iter()
        .all(|join| join.come_from().is_some_and(|source| source >= first))
        && check(ctx)
}

fn local_only(_: &ReduceContext<'_>) -> bool {
    true
}

/// Join markers a node consumes directly: marker children and the members
/// of `come_froms` children.
fn own_joins(node: &Node) -> Vec<&Token> {
    let mut joins = Vec::new();
    for child in &node.children {
        match child {
            Child::Token(tok) if tok.is_join() => joins.push(tok),
            Child::Node(inner) if inner.is("come_froms") => {
                joins.extend(inner.children.iter().filter_map(Child::as_token));
            }
            _ => {}
        }
    }
    joins
}

/// The jump a condition leaves by: its last jump instruction.
fn exit_target(test: &Node) -> Option<u32> {
    test.tokens()
        .into_iter()
        .rev()
        .find_map(Token::jump_target)
}
