//! The synthesis pipeline for one code object.
//!
//! ```text
//! RawInstruction* -> merge EXTENDED_ARG -> locate joins -> specialize
//!                 -> fold constant runs -> Token*
//! ```

mod decode;
mod fold;
mod joins;
mod specialize;

use rustc_hash::FxHashMap;
use undis_ir::{CodeObject, InstructionSet, Token};

use crate::DecodeError;

/// Default minimum run of constant pushes folded into a collection region.
pub const COLLECTION_THRESHOLD: usize = 10;

/// Token synthesizer settings.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ScanConfig {
    /// Constant runs of at least this length feeding one `BUILD_LIST`,
    /// `BUILD_TUPLE` or `BUILD_SET` become a collection region.
    pub collection_threshold: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            collection_threshold: COLLECTION_THRESHOLD,
        }
    }
}

/// Synthesized token stream plus the arity seed map.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    /// Arity of every specialized kind present, keyed by kind
    /// (`"CALL_FUNCTION_2"` -> 2).
    pub arities: FxHashMap<String, u32>,
}

/// Synthesize the token stream for one code object.
#[tracing::instrument(level = "debug", skip_all, fields(code = %code.name))]
pub fn scan(
    code: &CodeObject,
    set: &InstructionSet,
    config: &ScanConfig,
) -> Result<ScanOutput, DecodeError> {
    let decoded = decode::merge_extended_args(code, set)?;
    let joins = joins::locate(&decoded, set)?;
    let tokens = specialize::synthesize(code, set, &decoded, &joins)?;
    let tokens = fold::fold_constant_runs(tokens, config.collection_threshold);
    let arities = arity_seeds(&tokens);

    tracing::debug!(tokens = tokens.len(), specialized = arities.len(), "scanned");
    Ok(ScanOutput { tokens, arities })
}

/// Kinds of the form `<op>_<n>` seed the customization pass.
fn arity_seeds(tokens: &[Token]) -> FxHashMap<String, u32> {
    let mut seeds = FxHashMap::default();
    for tok in tokens {
        let Some(suffix) = tok.kind.strip_prefix(tok.op).and_then(|s| s.strip_prefix('_')) else {
            continue;
        };
        if let Ok(arity) = suffix.parse::<u32>() {
            seeds.entry(tok.kind.clone()).or_insert(arity);
        }
    }
    seeds
}
