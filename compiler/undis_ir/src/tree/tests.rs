use pretty_assertions::assert_eq;

use super::*;
use crate::{Attr, Offset};

fn tok(kind: &str, at: u32) -> Child {
    Child::Token(
        Token::new(kind, "NOP", Offset::at(at)).with_attr(Attr::Int(at), at.to_string()),
    )
}

fn sample() -> Node {
    Node::new(
        "assign",
        vec![
            Child::Node(Node::new("expr", vec![tok("LOAD_CONST", 0)])),
            Child::Node(Node::new("store", vec![tok("STORE_NAME", 2)])),
        ],
    )
}

#[test]
fn leaves_in_order() {
    let node = sample();
    let kinds: Vec<&str> = node.tokens().iter().map(|t| t.kind.as_str()).collect();
    assert_eq!(kinds, vec!["LOAD_CONST", "STORE_NAME"]);
    assert_eq!(node.first_token().map(|t| t.addr()), Some(0));
    assert_eq!(node.last_token().map(|t| t.addr()), Some(2));
}

#[test]
fn descend_by_path() {
    let node = sample();
    assert_eq!(node.descend(&[1, 0]).map(Child::kind), Some("STORE_NAME"));
    assert!(node.descend(&[0, 3]).is_none());
    assert!(node.descend(&[]).is_none());
}

#[test]
fn right_chain_depth_counts_same_kind_only() {
    let leaf = Node::new("stmts", vec![tok("NOP", 0)]);
    let mid = Node::new("stmts", vec![tok("NOP", 2), Child::Node(leaf)]);
    let top = Node::new("stmts", vec![tok("NOP", 4), Child::Node(mid)]);
    assert_eq!(top.right_chain_depth(), 2);
    assert_eq!(sample().right_chain_depth(), 0);
}

#[test]
fn dump_is_indented() {
    let text = sample().to_string();
    assert_eq!(
        text,
        "assign\n  expr\n    LOAD_CONST 0 @0\n  store\n    STORE_NAME 2 @2\n"
    );
}
