//! `if not cond: raise AssertionError(msg)` back to `assert cond, msg`.
//!
//! The compiler emits `assert` as a jump over a raise of the
//! `AssertionError` global; the synthesizer has already marked that load
//! as `LOAD_ASSERT`. PyPy guards the whole thing with `JUMP_IF_NOT_DEBUG`.

use undis_ir::{Child, Node, Token};

/// Pieces of an `if` that is really an `assert`, borrowed from the tree.
struct AssertParts<'n> {
    guard: Option<&'n Token>,
    test: &'n Child,
    jump: &'n Token,
    load: &'n Token,
    message: Option<(&'n Child, &'n Token)>,
    raise: &'n Token,
    come_froms: &'n Child,
}

impl AssertParts<'_> {
    fn into_node(self) -> Node {
        let mut children: Vec<Child> = Vec::with_capacity(8);
        children.extend(self.guard.cloned().map(Child::Token));
        children.push(self.test.clone());
        children.push(Child::Token(self.jump.clone()));
        children.push(Child::Token(self.load.clone()));
        let kind = match self.message {
            Some((message, call)) => {
                children.push(message.clone());
                children.push(Child::Token(call.clone()));
                "assert2"
            }
            None => "assert",
        };
        children.push(Child::Token(self.raise.clone()));
        children.push(self.come_froms.clone());
        let mut node = Node::new(kind, children);
        node.transformed_by = Some("assert");
        node
    }
}

fn match_assert(node: &Node) -> Option<AssertParts<'_>> {
    let (guard, base) = if node.is("ifstmt_debug") {
        (Some(node.token(0)?), 1)
    } else if node.is("ifstmt") && node.len() == 3 {
        (None, 0)
    } else {
        return None;
    };

    let test = node
        .node(base)?
        .node(0)
        .filter(|n| n.is("testtrue"))?;
    let body = node.node(base + 1)?;
    if body.len() != 1 {
        return None;
    }
    let raise_stmt = body.node(0)?.node(0).filter(|n| n.is("raise_stmt1"))?;
    let raised = raise_stmt.node(0)?;

    let (load, message) = match raised.child(0)? {
        Child::Token(load) => (load, None),
        Child::Node(call) if call.is("call") && call.len() == 3 => (
            call.node(0)?.token(0)?,
            Some((call.child(1)?, call.token(2)?)),
        ),
        Child::Node(_) => return None,
    };
    if load.kind != "LOAD_ASSERT" {
        return None;
    }

    Some(AssertParts {
        guard,
        test: test.child(0)?,
        jump: test.token(1)?,
        load,
        message,
        raise: raise_stmt.token(1)?,
        come_froms: node.child(base + 2)?,
    })
}

/// On a `stmt` wrapping an assert-shaped `if`, replace the `if`.
pub(crate) fn fold_assert(stmt: &mut Node) -> bool {
    if !stmt.is("stmt") {
        return false;
    }
    let Some(folded) = stmt.node(0).and_then(match_assert).map(AssertParts::into_node) else {
        return false;
    };
    stmt.children[0] = Child::Node(folded);
    true
}
