//! Undis driver - runs the decompiler pipeline end to end.
//!
//! # Stages
//!
//! ```text
//! Artifact (from the artifact reader)
//!     │
//!     ▼
//! undis_scan::scan ──► tokens
//!     │
//!     ▼
//! undis_grammar::assemble ──► grammar (per object)
//!     │
//!     ▼
//! undis_parse::parse ──► tree
//!     │
//!     ▼
//! undis_transform::transform ──► tree
//!     │
//!     ▼
//! undis_gen::Generator ──► text (re-enters the stages above for nested code)
//! ```
//!
//! Each stage either succeeds or returns one error, which surfaces as a
//! [`DecompileError`]. A failed object yields no text.
//!
//! # Tracing
//!
//! Call [`init_tracing`] once at startup. Enable with
//! `RUST_LOG=undis_parse=trace` and similar.

mod batch;
mod config;
mod error;
mod header;
mod pipeline;

use std::sync::Once;

pub use batch::{decompile_batch, BatchReport};
pub use config::DecompileConfig;
pub use error::DecompileError;
pub use header::header;
pub use pipeline::{decompile, Decompiled, Decompiler};

pub use undis_gen::{GenConfig, Generated, Parsed};
pub use undis_grammar::CompileMode;
pub use undis_ir::{Artifact, CodeObject, Variant, Version};
pub use undis_scan::ScanConfig;

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical tracing subscriber filtered by `RUST_LOG`.
///
/// Safe to call more than once. Does nothing when `RUST_LOG` is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .with(filter)
                .init();
        }
    });
}
