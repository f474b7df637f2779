use pretty_assertions::assert_eq;
use proptest::prelude::*;
use undis_driver::{decompile, CompileMode, DecompileConfig, Decompiler, Variant, Version};
use undis_ir::{Constant, Node};

use crate::asm::{artifact, Asm};

/// `(mnemonic, text, precedence)`.
const OPERATORS: &[(&str, &str, u8)] = &[
    ("BINARY_OR", "|", 7),
    ("BINARY_ADD", "+", 11),
    ("BINARY_SUBTRACT", "-", 11),
    ("BINARY_MULTIPLY", "*", 12),
    ("BINARY_POWER", "**", 14),
];

const NAMES: &[&str] = &["a", "b", "c", "d"];

#[derive(Clone, Debug)]
enum Expr {
    Name(usize),
    Binary(usize, Box<Expr>, Box<Expr>),
}

fn expr() -> impl Strategy<Value = Expr> {
    (0..NAMES.len())
        .prop_map(Expr::Name)
        .prop_recursive(4, 24, 2, |inner| {
            (0..OPERATORS.len(), inner.clone(), inner)
                .prop_map(|(op, l, r)| Expr::Binary(op, Box::new(l), Box::new(r)))
        })
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Name(_) => u8::MAX,
            Expr::Binary(op, _, _) => OPERATORS[*op].2,
        }
    }

    /// Postfix instruction order, as the compiler emits it.
    fn assemble(&self, asm: Asm) -> Asm {
        match self {
            Expr::Name(i) => asm.op("LOAD_NAME", u32::try_from(*i).unwrap()),
            Expr::Binary(op, l, r) => r.assemble(l.assemble(asm)).op(OPERATORS[*op].0, 0),
        }
    }

    /// Minimal parenthesization: wrap a looser left operand, and a right
    /// operand that is not strictly tighter; `**` the other way round.
    fn expected(&self) -> String {
        match self {
            Expr::Name(i) => NAMES[*i].to_owned(),
            Expr::Binary(op, l, r) => {
                let (_, text, prec) = OPERATORS[*op];
                let power = text == "**";
                let wrap = |e: &Expr, loose: bool| {
                    if loose {
                        format!("({})", e.expected())
                    } else {
                        e.expected()
                    }
                };
                let left = if power { l.precedence() <= prec } else { l.precedence() < prec };
                let right = if power { r.precedence() < prec } else { r.precedence() <= prec };
                format!("{} {text} {}", wrap(l, left), wrap(r, right))
            }
        }
    }
}

fn assignment(e: &Expr) -> undis_ir::CodeObject {
    let mut names = NAMES.to_vec();
    names.push("x");
    e.assemble(
        Asm::new(Version::V3_7, "<module>")
            .consts(vec![Constant::None])
            .names(&names),
    )
    .ops(&[("STORE_NAME", 4), ("LOAD_CONST", 0), ("RETURN_VALUE", 0)])
    .build()
}

/// Deepest run of nodes of `kind` each nested as a child of the previous.
fn chain_depth(node: &Node, kind: &str) -> usize {
    let below = node
        .children
        .iter()
        .filter_map(|c| c.as_node())
        .map(|child| chain_depth(child, kind))
        .max()
        .unwrap_or(0);
    let own = node
        .children
        .iter()
        .filter_map(|c| c.as_node())
        .filter(|child| child.is(kind))
        .map(|child| 1 + chain_depth_same(child, kind))
        .max()
        .unwrap_or(0);
    below.max(own)
}

fn chain_depth_same(node: &Node, kind: &str) -> usize {
    node.children
        .iter()
        .filter_map(|c| c.as_node())
        .filter(|child| child.is(kind))
        .map(|child| 1 + chain_depth_same(child, kind))
        .max()
        .unwrap_or(0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parentheses_follow_precedence(e in expr()) {
        let config = DecompileConfig::default().without_header();
        let out = decompile(&artifact(Version::V3_7, assignment(&e)), &config).unwrap();
        prop_assert_eq!(out.text, format!("x = {}\n", e.expected()));
    }

    #[test]
    fn same_input_same_text(e in expr()) {
        let module = artifact(Version::V3_7, assignment(&e));
        let config = DecompileConfig::default();
        let first = decompile(&module, &config).unwrap();
        let second = decompile(&module, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn statement_lists_stay_flat(count in 1usize..80) {
        let mut asm = Asm::new(Version::V3_7, "<module>")
            .consts(vec![Constant::Int(1), Constant::None])
            .names(&["x"]);
        for _ in 0..count {
            asm = asm.op("LOAD_CONST", 0).op("STORE_NAME", 0);
        }
        let module = asm.op("LOAD_CONST", 1).op("RETURN_VALUE", 0).build();

        let decompiler =
            Decompiler::new(Version::V3_7, Variant::CPython, DecompileConfig::default()).unwrap();
        let parsed = decompiler.front(&module, CompileMode::Exec).unwrap();
        let stmts = parsed.tree.node(0).unwrap();
        prop_assert!(stmts.is("stmts"));
        prop_assert_eq!(stmts.len(), count);
        prop_assert!(chain_depth(&parsed.tree, "stmts") <= 1);
    }
}

#[test]
fn folded_constants_stay_flat() {
    let count = 300u32;
    let mut asm = Asm::new(Version::V3_7, "<module>")
        .consts((0..i64::from(count)).map(Constant::Int).chain([Constant::None]).collect())
        .names(&["x"]);
    for i in 0..count {
        asm = asm.op("LOAD_CONST", i);
    }
    let module = asm
        .ops(&[
            ("BUILD_TUPLE", count),
            ("STORE_NAME", 0),
            ("LOAD_CONST", count),
            ("RETURN_VALUE", 0),
        ])
        .build();
    let decompiler =
        Decompiler::new(Version::V3_7, Variant::CPython, DecompileConfig::default()).unwrap();
    let parsed = decompiler.front(&module, CompileMode::Exec).unwrap();
    assert!(chain_depth(&parsed.tree, "add_consts") <= 1);
    assert_eq!(chain_depth(&parsed.tree, "stmts"), 1);
}
