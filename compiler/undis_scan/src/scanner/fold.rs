//! Constant-run folding.
//!
//! `LOAD_CONST` x N followed by `BUILD_LIST_N` would otherwise need a rule
//! with N `expr` symbols. For long runs the tokens are rewritten into
//! `COLLECTION_START ADD_VALUE{N} BUILD_LIST`, which a single left-recursive
//! rule covers in linear time.

use undis_ir::{Attr, Offset, Token};

const FOLDABLE: &[(&str, &str)] = &[
    ("BUILD_LIST", "list"),
    ("BUILD_TUPLE", "tuple"),
    ("BUILD_SET", "set"),
];

/// Container word and element count of an arity-specialized build token.
fn foldable_build(tok: &Token) -> Option<(&'static str, u32)> {
    let &(_, word) = FOLDABLE.iter().find(|(op, _)| *op == tok.op)?;
    if tok.kind == tok.op {
        return None;
    }
    Some((word, tok.attr.as_int()?))
}

fn is_constant_push(tok: &Token) -> bool {
    matches!(tok.kind.as_str(), "LOAD_CONST" | "LOAD_STR")
}

/// Fold qualifying runs. A `threshold` of zero disables folding.
pub(super) fn fold_constant_runs(tokens: Vec<Token>, threshold: usize) -> Vec<Token> {
    if threshold == 0 {
        return tokens;
    }
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len() + 1);
    for mut tok in tokens {
        let Some((word, count)) = foldable_build(&tok) else {
            out.push(tok);
            continue;
        };
        let Some(first) = out.len().checked_sub(count as usize) else {
            out.push(tok);
            continue;
        };
        if (count as usize) < threshold || !out[first..].iter().all(is_constant_push) {
            out.push(tok);
            continue;
        }
        // A jump landing on the first element leaves a marker right before it.
        let targeted = first
            .checked_sub(1)
            .and_then(|i| out.get(i))
            .is_some_and(|prev| prev.is_join() && prev.addr() == out[first].addr());
        if targeted {
            out.push(tok);
            continue;
        }

        let values = out.split_off(first);
        let start_offset = Offset::join_marker(values[0].offset, 0);
        out.push(
            Token::new("COLLECTION_START", "COLLECTION_START", start_offset)
                .with_attr(Attr::Int(count), word),
        );
        out.extend(values.into_iter().map(|mut value| {
            value.kind = "ADD_VALUE".to_owned();
            value
        }));
        tok.kind = tok.op.to_owned();
        tracing::trace!(count, kind = %tok.kind, "folded constant run");
        out.push(tok);
    }
    out
}
