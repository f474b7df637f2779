//! Statements the compiler adds to module and class bodies.

use undis_ir::{Node, Token};

use crate::{node_mut, retag};

/// `(value token, stored name)` of a plain `name = <load>` statement.
fn simple_assign(stmt: &Node) -> Option<(&Token, &str)> {
    let assign = stmt.node(0).filter(|n| n.is("assign"))?;
    let value = assign.node(0)?.token(0)?;
    let store = assign.node(1)?.token(0).filter(|t| t.kind == "STORE_NAME")?;
    Some((value, store.pattr.as_str()))
}

fn is_preamble(stmt: &Node) -> bool {
    match simple_assign(stmt) {
        Some((value, "__module__")) => value.kind == "LOAD_NAME" && value.pattr == "__name__",
        Some((value, "__qualname__")) => value.kind == "LOAD_STR",
        _ => false,
    }
}

fn is_docstring(stmt: &Node) -> bool {
    matches!(simple_assign(stmt), Some((value, "__doc__")) if value.kind == "LOAD_STR")
}

/// On a `module` node: tag the class preamble and the docstring that may
/// follow it.
pub(crate) fn tag_body(module: &mut Node) -> bool {
    if !module.is("module") {
        return false;
    }
    let Some(stmts) = node_mut(module, 0).filter(|n| n.is("stmts")) else {
        return false;
    };

    let mut changed = false;
    let mut index = 0;
    while let Some(stmt) = node_mut(stmts, index) {
        let kind = if is_preamble(stmt) {
            "class_preamble"
        } else if is_docstring(stmt) {
            "docstring"
        } else {
            break;
        };
        if let Some(assign) = node_mut(stmt, 0) {
            retag(assign, kind, "body");
            changed = true;
        }
        index += 1;
        if kind == "docstring" {
            break;
        }
    }
    changed
}
