//! Expression-level checks: short-circuit chains and conditional
//! expressions.

use undis_ir::{Node, Token};

use super::ReduceContext;

fn comes_from(marker: Option<&Token>, jump: Option<&Token>) -> bool {
    match (marker, jump) {
        (Some(marker), Some(jump)) => marker.come_from() == Some(jump.addr()),
        _ => false,
    }
}

/// `expr JUMP_IF_*_OR_POP expr COME_FROM`: the marker is this jump's.
pub(super) fn and_or(ctx: &ReduceContext<'_>) -> bool {
    ctx.node()
        .is_some_and(|node| comes_from(node.token(3), node.token(1)))
}

/// `expr POP_JUMP_IF_FALSE expr JUMP_FORWARD COME_FROM expr COME_FROM`.
pub(super) fn if_exp(ctx: &ReduceContext<'_>) -> bool {
    ctx.node().is_some_and(|node| {
        comes_from(node.token(4), node.token(1)) && comes_from(node.token(6), node.token(3))
    })
}

fn cond_target(cond: &Node) -> Option<u32> {
    cond.token(1).and_then(Token::jump_target)
}

/// Chained conditions: every `and` part leaves for the same place, and
/// every `or` part jumps into the body.
pub(super) fn testfalse(ctx: &ReduceContext<'_>) -> bool {
    let Some(node) = ctx.node() else {
        return false;
    };
    let Some(conds) = node.node(0) else {
        return true;
    };
    let parts = || conds.children.iter().filter_map(|c| c.as_node());
    match conds.kind.as_str() {
        "and_conds" => {
            let exit = node.token(2).and_then(Token::jump_target);
            exit.is_some() && parts().all(|cond| cond_target(cond) == exit)
        }
        "or_conds" => {
            let body = node.token(3).map(Token::addr);
            body.is_some() && parts().all(|cond| cond_target(cond) == body)
        }
        _ => true,
    }
}
