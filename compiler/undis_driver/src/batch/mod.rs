//! Many artifacts at once.
//!
//! Every artifact is independent: each worker builds its own pipeline, so
//! nothing is shared between threads but the read-only inputs.

use rayon::prelude::*;
use undis_ir::Artifact;

use crate::{decompile, DecompileConfig, DecompileError, Decompiled};

/// Worker stack size. Deeply nested code re-enters the parser and generator
/// on the same stack.
const WORKER_STACK: usize = 16 * 1024 * 1024;

/// Outcome per artifact, in input order, plus tallies.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<Result<Decompiled, DecompileError>>,
    pub succeeded: usize,
    pub failed: usize,
    /// Failures that are decompiler defects; also counted in `failed`.
    pub internal: usize,
}

impl BatchReport {
    fn collect(outcomes: Vec<Result<Decompiled, DecompileError>>) -> Self {
        let mut report = BatchReport {
            outcomes: Vec::new(),
            ..BatchReport::default()
        };
        for outcome in &outcomes {
            match outcome {
                Ok(_) => report.succeeded += 1,
                Err(err) => {
                    report.failed += 1;
                    if err.is_internal() {
                        report.internal += 1;
                    }
                }
            }
        }
        report.outcomes = outcomes;
        report
    }
}

/// Decompile `artifacts` on a scoped thread pool. Falls back to running
/// them one by one if the pool cannot be created.
#[tracing::instrument(level = "debug", skip_all, fields(artifacts = artifacts.len()))]
pub fn decompile_batch(artifacts: &[Artifact], config: &DecompileConfig) -> BatchReport {
    let outcomes = rayon::ThreadPoolBuilder::new()
        .stack_size(WORKER_STACK)
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| {
                artifacts
                    .par_iter()
                    .map(|artifact| decompile(artifact, config))
                    .collect::<Vec<_>>()
            })
        })
        .unwrap_or_else(|e| {
            tracing::warn!("failed to create thread pool ({e}), running sequentially");
            artifacts
                .iter()
                .map(|artifact| decompile(artifact, config))
                .collect()
        });

    let report = BatchReport::collect(outcomes);
    tracing::debug!(
        succeeded = report.succeeded,
        failed = report.failed,
        internal = report.internal,
        "batch finished"
    );
    report
}
