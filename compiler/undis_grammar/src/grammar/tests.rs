#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use undis_ir::{Offset, Token, Variant, Version};

use super::*;

fn target(version: Version, variant: Variant) -> Target {
    Target {
        version,
        variant,
        mode: CompileMode::Exec,
    }
}

fn rule(text: &str) -> Rule {
    parse_rules(text).unwrap().remove(0)
}

fn bare(version: Version, variant: Variant) -> Grammar {
    assemble(target(version, variant), &[], &FxHashMap::default()).unwrap()
}

#[test]
fn start_symbol_follows_the_mode() {
    let mut t = target(Version::V3_7, Variant::CPython);
    assert_eq!(bare(t.version, t.variant).start(), "module");
    t.mode = CompileMode::Lambda;
    assert_eq!(assemble(t, &[], &FxHashMap::default()).unwrap().start(), "lambda_start");
    assert_eq!(CompileMode::Comprehension.start_symbol(), "comp_func");
}

#[test]
fn unsupported_version_is_a_configuration_error() {
    let err = assemble(
        target(Version::new(3, 9), Variant::CPython),
        &[],
        &FxHashMap::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnsupportedVersion {
            version: Version::new(3, 9),
            variant: Variant::CPython
        }
    );
}

#[test]
fn python38_replaces_block_loops() {
    let old = rule("while1stmt ::= SETUP_LOOP stmts JUMP_BACK POP_BLOCK COME_FROM_LOOP");
    let new = rule("while1stmt ::= stmts JUMP_BACK come_froms");

    let g37 = bare(Version::V3_7, Variant::CPython);
    assert!(g37.contains(&old));
    assert!(!g37.contains(&new));

    let g38 = bare(Version::V3_8, Variant::CPython);
    assert!(!g38.contains(&old));
    assert!(g38.contains(&new));
    assert!(!g38.rules().contains(&old));
}

#[test]
fn pypy_delta_layers_on_either_version() {
    let debug = rule("ifstmt_debug ::= JUMP_IF_NOT_DEBUG testexpr stmts come_froms");
    assert!(!bare(Version::V3_7, Variant::CPython).contains(&debug));
    assert!(bare(Version::V3_7, Variant::PyPy).contains(&debug));
    assert!(bare(Version::V3_8, Variant::PyPy).contains(&debug));
}

#[test]
fn rules_are_deduplicated() {
    let mut g = Grammar::new(target(Version::V3_7, Variant::CPython));
    assert_eq!(g.add_text("a ::= b\na ::= b\na ::= c").unwrap(), 2);
    assert_eq!(g.rules().len(), 2);
    assert!(!g.add_rule(rule("a ::= c")));
    assert_eq!(g.remove_text("a ::= b\nz ::= q").unwrap(), 1);
    assert_eq!(g.rules(), &[rule("a ::= c")]);
}

#[test]
fn customization_only_adds_rules_for_present_kinds() {
    let tokens = vec![
        Token::new("LOAD_NAME", "LOAD_NAME", Offset::at(0)),
        Token::new("CALL_FUNCTION_0", "CALL_FUNCTION", Offset::at(2)),
        Token::new("CALL_FUNCTION_0", "CALL_FUNCTION", Offset::at(4)),
    ];
    let arities: FxHashMap<String, u32> = [("CALL_FUNCTION_0".to_string(), 0)].into_iter().collect();
    let base = bare(Version::V3_7, Variant::CPython);
    let g = assemble(target(Version::V3_7, Variant::CPython), &tokens, &arities).unwrap();

    assert_eq!(g.rules().len(), base.rules().len() + 1);
    assert!(g.contains(&rule("call ::= expr CALL_FUNCTION_0")));
    assert_eq!(g.customize().get("CALL_FUNCTION_0"), Some(0));
    assert_eq!(g.customize().len(), 1);
    assert!(base.customize().is_empty());
}
