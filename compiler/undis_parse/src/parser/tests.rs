#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use undis_grammar::{assemble, CompileMode, Target};
use undis_ir::{CodeObject, Constant, InstructionSet, RawInstruction, Variant, Version};
use undis_scan::{scan, ScanConfig};

use super::*;

// co_names indices used below.
const A: u32 = 0;
const B: u32 = 1;
const C: u32 = 2;
const X: u32 = 3;
const Y: u32 = 4;

fn parse_ops(version: Version, ops: &[(&str, u32)], config: ParseConfig) -> Result<Node, ParseError> {
    let set = InstructionSet::for_target(version, Variant::CPython).expect("supported version");
    let instructions = (0u32..)
        .step_by(2)
        .zip(ops)
        .map(|(offset, &(name, arg))| {
            let opcode = set.opcode(name).expect("known mnemonic");
            RawInstruction::new(offset, opcode, set.has_arg(opcode).then_some(arg))
        })
        .collect();
    let code = CodeObject {
        name: "<module>".into(),
        consts: vec![Constant::None, Constant::Int(1)],
        names: ["a", "b", "c", "x", "y"].map(String::from).to_vec(),
        instructions,
        ..CodeObject::default()
    };
    let out = scan(&code, &set, &ScanConfig::default()).expect("scans");
    let target = Target {
        version,
        variant: Variant::CPython,
        mode: CompileMode::Exec,
    };
    let grammar = assemble(target, &out.tokens, &out.arities).expect("assembles");
    parse(&grammar, &out.tokens, &set, config)
}

fn module(version: Version, ops: &[(&str, u32)]) -> Node {
    parse_ops(version, ops, ParseConfig::default()).expect("parses")
}

/// Kinds of the top-level statements.
fn statements(module: &Node) -> Vec<&str> {
    let stmts = module.node(0).expect("stmts");
    stmts
        .children
        .iter()
        .filter_map(|c| c.as_node()?.node(0))
        .map(|s| s.kind.as_str())
        .collect()
}

fn first_statement(module: &Node) -> &Node {
    module
        .descend(&[0, 0, 0])
        .and_then(Child::as_node)
        .expect("a statement")
}

const CALL_B: [(&str, u32); 3] = [("LOAD_NAME", B), ("CALL_FUNCTION", 0), ("POP_TOP", 0)];
const RETURN_NONE: [(&str, u32); 2] = [("LOAD_CONST", 0), ("RETURN_VALUE", 0)];

fn ops(parts: &[&[(&'static str, u32)]]) -> Vec<(&'static str, u32)> {
    parts.iter().flat_map(|p| p.iter().copied()).collect()
}

#[test]
fn if_else_with_forward_jump_is_one_statement() {
    // if a: b() else: c()
    let code = ops(&[
        &[("LOAD_NAME", A), ("POP_JUMP_IF_FALSE", 12)],
        &CALL_B,
        &[("JUMP_FORWARD", 6)],
        &[("LOAD_NAME", C), ("CALL_FUNCTION", 0), ("POP_TOP", 0)],
        &RETURN_NONE,
    ]);
    let tree = module(Version::V3_7, &code);
    assert_eq!(statements(&tree), vec!["ifelsestmt"]);
    assert_eq!(tree.node(1).map(|n| n.kind.as_str()), Some("return_last"));
}

#[test]
fn else_branch_ends_where_the_jump_lands() {
    // if a: b() else: x = c
    // y = c
    let code = ops(&[
        &[("LOAD_NAME", A), ("POP_JUMP_IF_FALSE", 12)],
        &CALL_B,
        &[("JUMP_FORWARD", 4)],
        &[("LOAD_NAME", C), ("STORE_NAME", X)],
        &[("LOAD_NAME", C), ("STORE_NAME", Y)],
        &RETURN_NONE,
    ]);
    let tree = module(Version::V3_7, &code);
    assert_eq!(statements(&tree), vec!["ifelsestmt", "assign"]);
}

#[test]
fn while_loop_38_is_not_an_if_with_continue() {
    let code = ops(&[
        &[("LOAD_NAME", A), ("POP_JUMP_IF_FALSE", 12)],
        &CALL_B,
        &[("JUMP_ABSOLUTE", 0)],
        &RETURN_NONE,
    ]);
    let tree = module(Version::V3_8, &code);
    assert_eq!(statements(&tree), vec!["whilestmt"]);
}

#[test]
fn while_loop_37_with_setup_loop() {
    let code = ops(&[
        &[("SETUP_LOOP", 14), ("LOAD_NAME", A), ("POP_JUMP_IF_FALSE", 14)],
        &CALL_B,
        &[("JUMP_ABSOLUTE", 2), ("POP_BLOCK", 0)],
        &RETURN_NONE,
    ]);
    let tree = module(Version::V3_7, &code);
    assert_eq!(statements(&tree), vec!["whilestmt"]);
}

#[test]
fn if_inside_for_jumps_back_to_the_loop() {
    // for x in y: if a: b()
    let code = ops(&[
        &[("LOAD_NAME", Y), ("GET_ITER", 0), ("FOR_ITER", 14), ("STORE_NAME", X)],
        &[("LOAD_NAME", A), ("POP_JUMP_IF_FALSE", 4)],
        &CALL_B,
        &[("JUMP_ABSOLUTE", 4)],
        &RETURN_NONE,
    ]);
    let tree = module(Version::V3_8, &code);
    assert_eq!(statements(&tree), vec!["forstmt"]);
    let body = first_statement(&tree).node(4).expect("loop body");
    assert_eq!(body.len(), 1);
    assert_eq!(body.descend(&[0, 0]).map(Child::kind), Some("ifstmt"));
}

#[test]
fn nested_ifs_sharing_a_target_parse() {
    let code = ops(&[
        &[("LOAD_NAME", A), ("POP_JUMP_IF_FALSE", 14)],
        &[("LOAD_NAME", B), ("POP_JUMP_IF_FALSE", 14)],
        &[("LOAD_NAME", C), ("CALL_FUNCTION", 0), ("POP_TOP", 0)],
        &RETURN_NONE,
    ]);
    let tree = module(Version::V3_8, &code);
    assert_eq!(statements(&tree), vec!["ifstmt"]);
}

#[test]
fn inner_if_can_share_the_outer_else_exit() {
    // if a:
    //     if b: x = 1
    // else: x = c
    let code = ops(&[
        &[("LOAD_NAME", A), ("POP_JUMP_IF_FALSE", 14)],
        &[("LOAD_NAME", B), ("POP_JUMP_IF_FALSE", 18)],
        &[("LOAD_CONST", 1), ("STORE_NAME", X), ("JUMP_FORWARD", 4)],
        &[("LOAD_NAME", C), ("STORE_NAME", X)],
        &RETURN_NONE,
    ]);
    for version in [Version::V3_7, Version::V3_8] {
        let tree = module(version, &code);
        assert_eq!(statements(&tree), vec!["ifelsestmt"]);
        let then = first_statement(&tree).node(1).expect("then branch");
        assert_eq!(then.descend(&[0, 0]).map(Child::kind), Some("ifstmt"));
    }
}

#[test]
fn tests_with_one_exit_make_one_condition() {
    // if a and b: c()
    let code = ops(&[
        &[("LOAD_NAME", A), ("POP_JUMP_IF_FALSE", 14)],
        &[("LOAD_NAME", B), ("POP_JUMP_IF_FALSE", 14)],
        &[("LOAD_NAME", C), ("CALL_FUNCTION", 0), ("POP_TOP", 0)],
        &RETURN_NONE,
    ]);
    let tree = module(Version::V3_7, &code);
    let stmt = first_statement(&tree);
    assert_eq!(stmt.kind, "ifstmt");
    assert_eq!(stmt.descend(&[0, 0, 0]).map(Child::kind), Some("and_conds"));
    assert_eq!(stmt.node(1).map(Node::len), Some(1));
}

#[test]
fn short_circuit_and_conditional_expressions() {
    // x = a and b
    let tree = module(
        Version::V3_7,
        &ops(&[
            &[("LOAD_NAME", A), ("JUMP_IF_FALSE_OR_POP", 6), ("LOAD_NAME", B)],
            &[("STORE_NAME", X)],
            &RETURN_NONE,
        ]),
    );
    let assign = first_statement(&tree);
    assert_eq!(assign.descend(&[0, 0]).map(Child::kind), Some("and"));

    // x = a if c else b
    let tree = module(
        Version::V3_7,
        &ops(&[
            &[("LOAD_NAME", C), ("POP_JUMP_IF_FALSE", 8), ("LOAD_NAME", A)],
            &[("JUMP_FORWARD", 2), ("LOAD_NAME", B), ("STORE_NAME", X)],
            &RETURN_NONE,
        ]),
    );
    let assign = first_statement(&tree);
    assert_eq!(assign.descend(&[0, 0]).map(Child::kind), Some("if_exp"));
}

#[test]
fn statement_lists_are_flat() {
    let mut code = Vec::new();
    for _ in 0..40 {
        code.extend([("LOAD_CONST", 1), ("STORE_NAME", X)]);
    }
    code.extend(RETURN_NONE);
    let tree = module(Version::V3_8, &code);
    let stmts = tree.node(0).unwrap();
    assert_eq!(stmts.len(), 40);
    assert_eq!(stmts.right_chain_depth(), 0);
}

#[test]
fn unexpected_token_reports_offset_and_expectations() {
    let err = parse_ops(
        Version::V3_7,
        &[("LOAD_NAME", A), ("POP_BLOCK", 0), ("LOAD_CONST", 0), ("RETURN_VALUE", 0)],
        ParseConfig { show_context: true },
    )
    .unwrap_err();
    let ParseError::UnexpectedToken {
        offset,
        kind,
        expected,
        context,
    } = err
    else {
        panic!("wrong error: {err:?}");
    };
    assert_eq!(offset.to_string(), "2");
    assert_eq!(kind, "POP_BLOCK");
    assert!(expected.iter().any(|k| k == "POP_TOP"));
    assert_eq!(context.len(), 4);
    assert!(context[1].starts_with("-->"));
}

#[test]
fn running_out_of_tokens_is_unexpected_end() {
    let err = parse_ops(
        Version::V3_7,
        &[("LOAD_CONST", 0), ("LOAD_NAME", A)],
        ParseConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), undis_diagnostic::ErrorCode::E3002);
    assert!(matches!(err, ParseError::UnexpectedEnd { ref context, .. } if context.is_empty()));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn parsing_is_deterministic(n in 1usize..12) {
        let mut code = Vec::new();
        for i in 0..n {
            let name = if i % 2 == 0 { A } else { B };
            code.extend([("LOAD_NAME", name), ("STORE_NAME", X)]);
        }
        code.extend(RETURN_NONE);
        let first = module(Version::V3_7, &code);
        let second = module(Version::V3_7, &code);
        prop_assert_eq!(first.node(0).map(Node::len), Some(n));
        prop_assert_eq!(first, second);
    }
}
