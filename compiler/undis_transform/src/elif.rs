//! `else:` holding exactly one `if` becomes `elif`.

use undis_ir::Node;

use crate::{node_mut, retag};

/// What an `if` kind becomes when it sits in an `else` by itself.
fn as_elif(kind: &str) -> Option<&'static str> {
    match kind {
        "ifstmt" => Some("elifstmt"),
        "ifelsestmt" => Some("elifelsestmt"),
        "ifelifstmt" => Some("elifelifstmt"),
        _ => None,
    }
}

pub(crate) fn fold_elif(node: &mut Node) -> bool {
    if !node.is("ifelsestmt") {
        return false;
    }
    let Some(orelse) = node_mut(node, 4) else {
        return false;
    };
    if orelse.len() != 1 {
        return false;
    }
    let Some(inner) = node_mut(orelse, 0).and_then(|stmt| node_mut(stmt, 0)) else {
        return false;
    };
    let Some(kind) = as_elif(&inner.kind) else {
        return false;
    };
    retag(inner, kind, "elif");
    retag(node, "ifelifstmt", "elif");
    true
}
