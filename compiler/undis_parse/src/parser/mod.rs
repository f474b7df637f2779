//! Recognize, then build.

use undis_grammar::Grammar;
use undis_ir::{Child, InstructionSet, Node, Token};

use crate::chart::{Chart, CompiledGrammar, Stall};
use crate::checks::{self, ReduceContext};
use crate::derive::{Deriver, Memo};
use crate::ParseError;

/// Tokens shown on each side of a failure when context is requested.
const CONTEXT_RADIUS: usize = 3;

/// Parser knobs.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ParseConfig {
    /// Attach the disassembly around a failure to the error.
    pub show_context: bool,
}

/// Parse one code object's tokens into a tree rooted at the grammar's start
/// symbol.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(start = grammar.start(), tokens = tokens.len())
)]
pub fn parse(
    grammar: &Grammar,
    tokens: &[Token],
    set: &InstructionSet,
    config: ParseConfig,
) -> Result<Node, ParseError> {
    let mut chart = Chart::new(CompiledGrammar::new(grammar), tokens);
    let mut memo = Memo::default();
    let mut rejected = 0usize;

    let outcome = chart.recognize(|chart, rule, from, to| {
        let lhs = chart.grammar.name(chart.grammar.rule(rule).lhs);
        let Some(check) = checks::check_for(lhs) else {
            return true;
        };
        let Some(ctx) = ReduceContext::new(chart, &mut memo, set, rule, from, to) else {
            return false;
        };
        let accepted = checks::run(check, &ctx);
        if !accepted {
            rejected += 1;
            tracing::trace!(
                rule = %ctx.rule(),
                first = %ctx.tokens().first().map(|t| t.offset.to_string()).unwrap_or_default(),
                last = %ctx.tokens().last().map(|t| t.offset.to_string()).unwrap_or_default(),
                "reduction rejected"
            );
            return false;
        }
        if let Some(node) = ctx.into_node() {
            memo.accept(rule, from, to, node);
        }
        true
    });
    tracing::debug!(rejected, "recognized");

    if let Err(stall) = outcome {
        return Err(stalled(&chart, stall, config));
    }

    let end = u32::try_from(tokens.len()).unwrap_or(u32::MAX);
    let start = chart.grammar.start;
    let mut deriver = Deriver::new(&chart, &mut memo, 0);
    start
        .and_then(|sym| deriver.derive_symbol(sym, 0, end))
        .and_then(|child| match child {
            Child::Node(node) => Some(node),
            Child::Token(_) => None,
        })
        .ok_or_else(|| stalled(&chart, Stall::End, config))
}

fn stalled(chart: &Chart<'_>, stall: Stall, config: ParseConfig) -> ParseError {
    let tokens = chart.tokens;
    match stall {
        Stall::UnknownKind(at) | Stall::Unexpected(at) => {
            let tok = &tokens[at];
            let expected = if matches!(stall, Stall::Unexpected(_)) {
                chart.expected(at).into_iter().map(str::to_owned).collect()
            } else {
                Vec::new()
            };
            ParseError::UnexpectedToken {
                offset: tok.offset,
                kind: tok.kind.clone(),
                expected,
                context: context(tokens, Some(at), config),
            }
        }
        Stall::End => ParseError::UnexpectedEnd {
            expected: chart.expected(tokens.len()).into_iter().map(str::to_owned).collect(),
            context: context(tokens, None, config),
        },
    }
}

/// Disassembly lines around token `at` (or the last few tokens), the
/// offending one marked with `-->`.
fn context(tokens: &[Token], at: Option<usize>, config: ParseConfig) -> Vec<String> {
    if !config.show_context || tokens.is_empty() {
        return Vec::new();
    }
    let center = at.unwrap_or(tokens.len() - 1);
    let lo = center.saturating_sub(CONTEXT_RADIUS);
    let hi = (center + CONTEXT_RADIUS + 1).min(tokens.len());
    (lo..hi)
        .map(|i| {
            let mark = if Some(i) == at { "-->" } else { "   " };
            format!("{mark}{}", tokens[i])
        })
        .collect()
}

#[cfg(test)]
mod tests;
