use pretty_assertions::assert_eq;
use undis_driver::{decompile, CodeObject, CompileMode, DecompileConfig, Decompiler, Variant, Version};
use undis_ir::{Child, Constant, Node};

use crate::asm::{artifact, code, render, Asm};

#[test]
fn if_with_else_is_one_statement() {
    let module = Asm::new(Version::V3_7, "<module>")
        .consts(vec![Constant::Int(1), Constant::Int(2), Constant::None])
        .names(&["a", "x"])
        .ops(&[
            ("LOAD_NAME", 0),
            ("POP_JUMP_IF_FALSE", 10),
            ("LOAD_CONST", 0),
            ("STORE_NAME", 1),
            ("JUMP_FORWARD", 4),
            ("LOAD_CONST", 1),
            ("STORE_NAME", 1),
            ("LOAD_CONST", 2),
            ("RETURN_VALUE", 0),
        ])
        .build();
    assert_eq!(
        render(Version::V3_7, module),
        "if a:\n    x = 1\nelse:\n    x = 2\n"
    );
}

#[test]
fn guarded_raise_becomes_assert_with_message() {
    let module = Asm::new(Version::V3_7, "<module>")
        .consts(vec![Constant::None, Constant::Str("msg".into())])
        .names(&["a", "AssertionError"])
        .ops(&[
            ("LOAD_NAME", 0),
            ("POP_JUMP_IF_TRUE", 12),
            ("LOAD_NAME", 1),
            ("LOAD_CONST", 1),
            ("CALL_FUNCTION", 1),
            ("RAISE_VARARGS", 1),
            ("LOAD_CONST", 0),
            ("RETURN_VALUE", 0),
        ])
        .build();
    assert_eq!(render(Version::V3_7, module), "assert a, 'msg'\n");
}

fn constant_list_module(count: u32) -> CodeObject {
    let mut asm = Asm::new(Version::V3_7, "<module>")
        .consts(
            (0..i64::from(count))
                .map(Constant::Int)
                .chain([Constant::None])
                .collect(),
        )
        .names(&["x"]);
    for i in 0..count {
        asm = asm.op("LOAD_CONST", i);
    }
    asm.ops(&[
        ("BUILD_LIST", count),
        ("STORE_NAME", 0),
        ("LOAD_CONST", count),
        ("RETURN_VALUE", 0),
    ])
    .build()
}

fn constant_list(count: u32) -> String {
    render(Version::V3_7, constant_list_module(count))
}

fn find<'n>(node: &'n Node, kind: &str) -> Option<&'n Node> {
    if node.is(kind) {
        return Some(node);
    }
    node.children
        .iter()
        .filter_map(Child::as_node)
        .find_map(|child| find(child, kind))
}

fn expected_list(count: u32) -> String {
    let items: Vec<String> = (0..count).map(|i| i.to_string()).collect();
    format!("x = [{}]\n", items.join(", "))
}

#[test]
fn long_constant_list_keeps_order() {
    assert_eq!(constant_list(1200), expected_list(1200));
}

#[test]
fn short_constant_list_is_not_folded_differently() {
    assert_eq!(constant_list(12), expected_list(12));
    assert_eq!(constant_list(3), expected_list(3));
}

#[test]
fn long_and_short_constant_lists_share_the_folded_path() {
    let decompiler =
        Decompiler::new(Version::V3_7, Variant::CPython, DecompileConfig::default()).unwrap();
    for count in [12u32, 1200] {
        let parsed = decompiler
            .front(&constant_list_module(count), CompileMode::Exec)
            .unwrap();
        let tokens = parsed.tree.tokens();
        assert_eq!(tokens.iter().filter(|t| t.kind == "COLLECTION_START").count(), 1);
        assert_eq!(
            tokens.iter().filter(|t| t.kind == "ADD_VALUE").count(),
            count as usize
        );
        let values = find(&parsed.tree, "add_consts").expect("folded constants");
        assert_eq!(values.len(), count as usize);
        assert_eq!(values.right_chain_depth(), 0);
        assert_eq!(constant_list(count), expected_list(count));
    }
}

#[test]
fn comprehension_inside_a_call_inside_a_function() {
    let listcomp = Asm::new(Version::V3_7, "<listcomp>")
        .locals(1, &[".0", "i"])
        .ops(&[
            ("BUILD_LIST", 0),
            ("LOAD_FAST", 0),
            ("FOR_ITER", 12),
            ("STORE_FAST", 1),
            ("LOAD_FAST", 1),
            ("POP_JUMP_IF_FALSE", 4),
            ("LOAD_FAST", 1),
            ("LIST_APPEND", 2),
            ("JUMP_ABSOLUTE", 4),
            ("RETURN_VALUE", 0),
        ])
        .build();
    let function = Asm::new(Version::V3_7, "f")
        .consts(vec![
            Constant::None,
            code(listcomp),
            Constant::Str("f.<locals>.<listcomp>".into()),
            Constant::Int(1),
        ])
        .names(&["len"])
        .locals(1, &["xs"])
        .ops(&[
            ("LOAD_GLOBAL", 0),
            ("LOAD_CONST", 1),
            ("LOAD_CONST", 2),
            ("MAKE_FUNCTION", 0),
            ("LOAD_FAST", 0),
            ("GET_ITER", 0),
            ("CALL_FUNCTION", 1),
            ("CALL_FUNCTION", 1),
            ("LOAD_CONST", 3),
            ("BINARY_ADD", 0),
            ("RETURN_VALUE", 0),
        ])
        .build();
    let module = Asm::new(Version::V3_7, "<module>")
        .consts(vec![code(function), Constant::Str("f".into()), Constant::None])
        .names(&["f"])
        .ops(&[
            ("LOAD_CONST", 0),
            ("LOAD_CONST", 1),
            ("MAKE_FUNCTION", 0),
            ("STORE_NAME", 0),
            ("LOAD_CONST", 2),
            ("RETURN_VALUE", 0),
        ])
        .build();
    assert_eq!(
        render(Version::V3_7, module),
        "def f(xs):\n    return len([i for i in xs if i]) + 1\n"
    );
}

#[test]
fn dict_comprehension_on_38_takes_the_key_first() {
    let dictcomp = Asm::new(Version::V3_8, "<dictcomp>")
        .consts(vec![Constant::Int(2)])
        .locals(1, &[".0", "i"])
        .ops(&[
            ("BUILD_MAP", 0),
            ("LOAD_FAST", 0),
            ("FOR_ITER", 14),
            ("STORE_FAST", 1),
            ("LOAD_FAST", 1),
            ("LOAD_FAST", 1),
            ("LOAD_CONST", 0),
            ("BINARY_MULTIPLY", 0),
            ("MAP_ADD", 2),
            ("JUMP_ABSOLUTE", 4),
            ("RETURN_VALUE", 0),
        ])
        .build();
    let module = Asm::new(Version::V3_8, "<module>")
        .consts(vec![code(dictcomp), Constant::Str("<dictcomp>".into()), Constant::None])
        .names(&["xs", "d"])
        .ops(&[
            ("LOAD_CONST", 0),
            ("LOAD_CONST", 1),
            ("MAKE_FUNCTION", 0),
            ("LOAD_NAME", 0),
            ("GET_ITER", 0),
            ("CALL_FUNCTION", 1),
            ("STORE_NAME", 1),
            ("LOAD_CONST", 2),
            ("RETURN_VALUE", 0),
        ])
        .build();
    assert_eq!(render(Version::V3_8, module), "d = {i: i * 2 for i in xs}\n");
}

#[test]
fn for_loop_with_and_without_setup_loop() {
    let names = ["xs", "x", "f"];
    let py37 = Asm::new(Version::V3_7, "<module>")
        .consts(vec![Constant::None])
        .names(&names)
        .ops(&[
            ("SETUP_LOOP", 20),
            ("LOAD_NAME", 0),
            ("GET_ITER", 0),
            ("FOR_ITER", 12),
            ("STORE_NAME", 1),
            ("LOAD_NAME", 2),
            ("LOAD_NAME", 1),
            ("CALL_FUNCTION", 1),
            ("POP_TOP", 0),
            ("JUMP_ABSOLUTE", 6),
            ("POP_BLOCK", 0),
            ("LOAD_CONST", 0),
            ("RETURN_VALUE", 0),
        ])
        .build();
    let py38 = Asm::new(Version::V3_8, "<module>")
        .consts(vec![Constant::None])
        .names(&names)
        .ops(&[
            ("LOAD_NAME", 0),
            ("GET_ITER", 0),
            ("FOR_ITER", 12),
            ("STORE_NAME", 1),
            ("LOAD_NAME", 2),
            ("LOAD_NAME", 1),
            ("CALL_FUNCTION", 1),
            ("POP_TOP", 0),
            ("JUMP_ABSOLUTE", 4),
            ("LOAD_CONST", 0),
            ("RETURN_VALUE", 0),
        ])
        .build();
    let expected = "for x in xs:\n    f(x)\n";
    assert_eq!(render(Version::V3_7, py37), expected);
    assert_eq!(render(Version::V3_8, py38), expected);
}

#[test]
fn line_map_counts_from_the_body() {
    let module = Asm::new(Version::V3_7, "<module>")
        .consts(vec![Constant::Int(1), Constant::None])
        .names(&["a", "b"])
        .line(1)
        .op("LOAD_CONST", 0)
        .op("STORE_NAME", 0)
        .line(4)
        .op("LOAD_NAME", 0)
        .op("STORE_NAME", 1)
        .op("LOAD_CONST", 1)
        .op("RETURN_VALUE", 0)
        .build();
    let config = DecompileConfig::default().with_line_map();
    let out = decompile(&artifact(Version::V3_7, module), &config).unwrap();
    assert!(out.text.ends_with("a = 1\nb = a\n"));
    assert_eq!(out.line_map, vec![(1, 1), (4, 2)]);
}

#[test]
fn parse_failure_names_the_offset() {
    // A stray ROT_TWO has no place in any statement.
    let module = Asm::new(Version::V3_7, "<module>")
        .consts(vec![Constant::None])
        .ops(&[("ROT_TWO", 0), ("LOAD_CONST", 0), ("RETURN_VALUE", 0)])
        .build();
    let config = DecompileConfig {
        show_context: true,
        ..DecompileConfig::default()
    };
    let err = decompile(&artifact(Version::V3_7, module), &config).unwrap_err();
    assert!(!err.is_internal());
    assert!(err.to_string().contains("offset 0"), "{err}");
}

#[test]
fn inner_if_exits_through_the_outer_else_jump() {
    // The inner test's exit is retargeted past the outer `else`.
    let module = |version| {
        Asm::new(version, "<module>")
            .consts(vec![Constant::Int(1), Constant::Int(2), Constant::None])
            .names(&["a", "b", "x"])
            .ops(&[
                ("LOAD_NAME", 0),
                ("POP_JUMP_IF_FALSE", 14),
                ("LOAD_NAME", 1),
                ("POP_JUMP_IF_FALSE", 18),
                ("LOAD_CONST", 0),
                ("STORE_NAME", 2),
                ("JUMP_FORWARD", 4),
                ("LOAD_CONST", 1),
                ("STORE_NAME", 2),
                ("LOAD_CONST", 2),
                ("RETURN_VALUE", 0),
            ])
            .build()
    };
    for version in [Version::V3_7, Version::V3_8] {
        assert_eq!(
            render(version, module(version)),
            "if a:\n    if b:\n        x = 1\nelse:\n    x = 2\n"
        );
    }
}

#[test]
fn tests_sharing_an_exit_join_with_and() {
    let module = Asm::new(Version::V3_8, "<module>")
        .consts(vec![Constant::Int(1), Constant::None])
        .names(&["a", "b", "x"])
        .ops(&[
            ("LOAD_NAME", 0),
            ("POP_JUMP_IF_FALSE", 12),
            ("LOAD_NAME", 1),
            ("POP_JUMP_IF_FALSE", 12),
            ("LOAD_CONST", 0),
            ("STORE_NAME", 2),
            ("LOAD_CONST", 1),
            ("RETURN_VALUE", 0),
        ])
        .build();
    assert_eq!(render(Version::V3_8, module), "if a and b:\n    x = 1\n");
}

#[test]
fn star_arguments_and_unpacking_displays() {
    let module = Asm::new(Version::V3_7, "<module>")
        .consts(vec![Constant::Tuple(Vec::new()), Constant::None])
        .names(&["f", "a", "b", "x"])
        .ops(&[
            // f(*a, *b)
            ("LOAD_NAME", 0),
            ("LOAD_NAME", 1),
            ("LOAD_NAME", 2),
            ("BUILD_TUPLE_UNPACK_WITH_CALL", 2),
            ("CALL_FUNCTION_EX", 0),
            ("POP_TOP", 0),
            // f(**a, **b)
            ("LOAD_NAME", 0),
            ("LOAD_CONST", 0),
            ("LOAD_NAME", 1),
            ("LOAD_NAME", 2),
            ("BUILD_MAP_UNPACK_WITH_CALL", 2),
            ("CALL_FUNCTION_EX", 1),
            ("POP_TOP", 0),
            // x = {*a, *b}
            ("LOAD_NAME", 1),
            ("LOAD_NAME", 2),
            ("BUILD_SET_UNPACK", 2),
            ("STORE_NAME", 3),
            // x = (*a, *b)
            ("LOAD_NAME", 1),
            ("LOAD_NAME", 2),
            ("BUILD_TUPLE_UNPACK", 2),
            ("STORE_NAME", 3),
            ("LOAD_CONST", 1),
            ("RETURN_VALUE", 0),
        ])
        .build();
    assert_eq!(
        render(Version::V3_7, module),
        "f(*a, *b)\nf(**a, **b)\nx = {*a, *b}\nx = (*a, *b)\n"
    );
}
