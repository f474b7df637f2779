//! Statement-level checks: conditionals and loops.

use undis_ir::{Child, Node, Token};

use super::{exit_target, own_joins, ReduceContext};

/// Address of the first token after child `index`, continuing into the
/// lookahead when the node ends there.
fn addr_after(ctx: &ReduceContext<'_>, node: &Node, index: usize) -> Option<u32> {
    node.children
        .get(index + 1..)
        .into_iter()
        .flatten()
        .find_map(Child::first_token)
        .map(Token::addr)
        .or_else(|| ctx.end_addr())
}

fn lands_at(expected: Option<u32>, target: u32) -> bool {
    expected.map_or(true, |addr| addr == target)
}

fn has_setup_loop(node: &Node) -> bool {
    node.token(0).is_some_and(|t| t.kind == "SETUP_LOOP")
}

fn direct_token<'n>(node: &'n Node, kind: &str) -> Option<&'n Token> {
    node.children
        .iter()
        .filter_map(Child::as_token)
        .find(|t| t.kind == kind)
}

/// `testexpr stmts [JUMP_FORWARD] come_froms`.
pub(super) fn ifstmt(ctx: &ReduceContext<'_>) -> bool {
    let Some(node) = ctx.node() else {
        return false;
    };
    let (Some(test), Some(body)) = (node.node(0), node.node(1)) else {
        return false;
    };
    let Some(target) = exit_target(test) else {
        return false;
    };
    let first = ctx.first_addr();

    // A body that jumps back to this very test is a loop.
    if body
        .last_token()
        .is_some_and(|t| t.kind == "JUMP_BACK" && t.jump_target() == Some(first))
    {
        return false;
    }
    if target <= first {
        return true;
    }

    match node.token(2) {
        // Empty `else`: the jump must land right after this statement.
        Some(jump) => {
            lands_at(addr_after(ctx, node, 2), target)
                && jump
                    .jump_target()
                    .is_some_and(|to| lands_at(ctx.end_addr(), to))
        }
        // The body falls into an outer `else` skip that goes where the test
        // would have gone.
        None => lands_at(addr_after(ctx, node, 1), target) || skips_to(ctx, target),
    }
}

/// The lookahead is an unconditional jump to `target`.
fn skips_to(ctx: &ReduceContext<'_>, target: u32) -> bool {
    ctx.lookahead().is_some_and(|t| {
        matches!(t.kind.as_str(), "JUMP_FORWARD" | "JUMP_ABSOLUTE") && t.jump_target() == Some(target)
    })
}

/// `testexpr stmts JUMP_FORWARD come_froms stmts come_froms`.
pub(super) fn ifelsestmt(ctx: &ReduceContext<'_>) -> bool {
    let Some(node) = ctx.node() else {
        return false;
    };
    let (Some(test), Some(jump), Some(orelse)) = (node.node(0), node.token(2), node.node(4))
    else {
        return false;
    };
    let (Some(else_first), Some(else_last)) = (orelse.first_token(), orelse.last_token()) else {
        return false;
    };
    exit_target(test) == Some(else_first.addr())
        && jump.jump_target().is_some_and(|to| to > else_last.addr())
}

/// `testexpr stmts JUMP_BACK come_froms stmts`: the `then` branch continues
/// an enclosing loop.
pub(super) fn ifelsestmtc(ctx: &ReduceContext<'_>) -> bool {
    let Some(node) = ctx.node() else {
        return false;
    };
    let (Some(test), Some(back), Some(orelse)) = (node.node(0), node.token(2), node.node(4))
    else {
        return false;
    };
    let Some(else_first) = orelse.first_token() else {
        return false;
    };
    exit_target(test) == Some(else_first.addr())
        && back.jump_target().is_some_and(|to| to < ctx.first_addr())
}

/// `[SETUP_LOOP] testexpr stmts JUMP_BACK ...`.
pub(super) fn whilestmt(ctx: &ReduceContext<'_>) -> bool {
    let Some(node) = ctx.node() else {
        return false;
    };
    let base = usize::from(has_setup_loop(node));
    let (Some(test), Some(back)) = (node.node(base), node.token(base + 2)) else {
        return false;
    };
    let (Some(head), Some(exit)) = (test.first_token(), exit_target(test)) else {
        return false;
    };
    back.jump_target() == Some(head.addr()) && exit > back.addr()
}

/// `[SETUP_LOOP] stmts JUMP_BACK ...`: an unconditional loop, only left by
/// `break`.
pub(super) fn while1stmt(ctx: &ReduceContext<'_>) -> bool {
    let Some(node) = ctx.node() else {
        return false;
    };
    let base = usize::from(has_setup_loop(node));
    let (Some(body), Some(back)) = (node.node(base), node.token(base + 1)) else {
        return false;
    };
    let Some(head) = body.first_token() else {
        return false;
    };
    if back.jump_target() != Some(head.addr()) {
        return false;
    }
    own_joins(node).iter().all(|join| {
        join.come_from()
            .and_then(|source| ctx.instruction_at(source))
            .is_some_and(|source| !ctx.set().is_conditional_jump(source.op))
    })
}

/// The loop's backward jump returns to its own `FOR_ITER`.
pub(super) fn forstmt(ctx: &ReduceContext<'_>) -> bool {
    let Some(node) = ctx.node() else {
        return false;
    };
    let (Some(iter), Some(back)) = (
        direct_token(node, "FOR_ITER"),
        direct_token(node, "JUMP_BACK"),
    ) else {
        return false;
    };
    back.jump_target() == Some(iter.addr())
}
