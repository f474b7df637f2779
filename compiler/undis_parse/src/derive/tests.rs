#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use undis_grammar::{CompileMode, Grammar, Target};
use undis_ir::{Offset, Token, Variant, Version};

use super::*;
use crate::chart::CompiledGrammar;

fn grammar(text: &str) -> Grammar {
    let mut g = Grammar::new(Target {
        version: Version::V3_7,
        variant: Variant::CPython,
        mode: CompileMode::Exec,
    });
    g.add_text(text).unwrap();
    g
}

fn derive(text: &str, kinds: &[&str]) -> Node {
    let g = grammar(text);
    let toks: Vec<Token> = (0u32..)
        .step_by(2)
        .zip(kinds)
        .map(|(at, &kind)| Token::new(kind, "NOP", Offset::at(at)))
        .collect();
    let mut chart = Chart::new(CompiledGrammar::new(&g), &toks);
    chart.recognize(|_, _, _, _| true).unwrap();
    let mut memo = Memo::default();
    let start = chart.grammar.start.unwrap();
    let end = u32::try_from(toks.len()).unwrap();
    match Deriver::new(&chart, &mut memo, 0).derive_symbol(start, 0, end) {
        Some(Child::Node(node)) => node,
        other => panic!("no tree: {other:?}"),
    }
}

fn shape(node: &Node) -> String {
    let inner: Vec<String> = node
        .children
        .iter()
        .map(|c| match c {
            Child::Token(t) => t.kind.clone(),
            Child::Node(n) => shape(n),
        })
        .collect();
    format!("{}({})", node.kind, inner.join(" "))
}

#[test]
fn preference_picks_if_else_over_if() {
    let node = derive(
        "
        module ::= stmt
        stmt ::= ifstmt
        stmt ::= ifelsestmt
        ifstmt ::= A
        ifelsestmt ::= A
        ",
        &["A"],
    );
    assert_eq!(shape(&node), "module(stmt(ifelsestmt(A)))");
}

#[test]
fn last_child_is_as_long_as_possible() {
    let node = derive(
        "
        module ::= xs
        xs ::= xs x
        xs ::= x
        x ::= A
        x ::= A A
        ",
        &["A", "A", "A"],
    );
    assert_eq!(shape(&node), "module(xs(xs(x(A)) x(A A)))");
}

#[test]
fn collect_nonterminals_come_out_flat() {
    let node = derive(
        "
        module ::= stmts
        stmts ::= stmts stmt
        stmts ::= stmt
        stmt ::= A
        ",
        &["A"; 50],
    );
    let stmts = node.node(0).unwrap();
    assert_eq!(stmts.len(), 50);
    assert_eq!(stmts.right_chain_depth(), 0);
    assert!(stmts.children.iter().all(|c| c.kind() == "stmt"));
}

#[test]
fn build_splices_only_same_kind_children() {
    let inner = Node::new("come_froms", vec![Child::Node(Node::new("x", Vec::new()))]);
    let outer = build(
        "come_froms",
        vec![
            Child::Node(inner),
            Child::Node(Node::new("stmts", Vec::new())),
        ],
    );
    assert_eq!(shape(&outer), "come_froms(x() stmts())");
    let plain = build("ifstmt", vec![Child::Node(Node::new("ifstmt", Vec::new()))]);
    assert_eq!(shape(&plain), "ifstmt(ifstmt())");
}

#[test]
fn accepted_subtrees_are_reused() {
    let g = grammar(
        "
        module ::= stmt
        stmt ::= A
        ",
    );
    let toks = vec![Token::new("A", "NOP", Offset::at(0))];
    let mut chart = Chart::new(CompiledGrammar::new(&g), &toks);
    chart.recognize(|_, _, _, _| true).unwrap();

    // Rule 1 is `stmt ::= A`; stand in a subtree that differs from a fresh
    // derivation.
    let mut memo = Memo::default();
    memo.accept(1, 0, 1, Node::new("stmt", Vec::new()));
    let start = chart.grammar.start.unwrap();
    let node = match Deriver::new(&chart, &mut memo, 0).derive_symbol(start, 0, 1) {
        Some(Child::Node(node)) => node,
        other => panic!("no tree: {other:?}"),
    };
    assert_eq!(shape(&node), "module(stmt())");
}

#[test]
fn conditions_take_every_test_they_can() {
    // With a split free after `testexpr`, the condition grows and the body
    // shrinks.
    let node = derive(
        "
        module ::= ifstmt
        ifstmt ::= testexpr stmts
        testexpr ::= tests
        tests ::= tests T
        tests ::= T
        stmts ::= stmts stmt
        stmts ::= stmt
        stmt ::= T
        stmt ::= A
        ",
        &["T", "T", "A"],
    );
    assert_eq!(
        shape(&node),
        "module(ifstmt(testexpr(tests(tests(T) T)) stmts(stmt(A))))"
    );
}
