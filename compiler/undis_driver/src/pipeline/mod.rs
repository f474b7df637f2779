//! One code object through all five stages.
//!
//! ```text
//! CodeObject ──scan──► tokens ──assemble──► grammar ──parse──► tree
//!      ──transform──► tree ──generate──► text
//! ```
//!
//! Nested objects (function bodies, lambdas, comprehensions) go through the
//! same front half again with a fresh grammar and parser each time; the
//! generator calls back in through [`NestedDecompiler`].

use std::sync::Arc;

use undis_gen::{Generated, Generator, NestedDecompiler, Parsed};
use undis_grammar::{assemble, CompileMode, ConfigError, Target};
use undis_ir::{Artifact, CodeObject, InstructionSet, Variant, Version};
use undis_parse::{parse, ParseConfig};
use undis_scan::scan;
use undis_transform::transform;

use crate::header::header;
use crate::{DecompileConfig, DecompileError};

/// Text produced for one artifact.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Decompiled {
    pub text: String,
    /// `(source line, output line)` pairs for the body, when requested.
    /// Output lines count from the first body line, after any header.
    pub line_map: Vec<(u32, usize)>,
}

/// Reusable pipeline for one bytecode version and runtime.
pub struct Decompiler {
    version: Version,
    variant: Variant,
    set: InstructionSet,
    generator: Generator,
    config: DecompileConfig,
}

impl Decompiler {
    pub fn new(
        version: Version,
        variant: Variant,
        config: DecompileConfig,
    ) -> Result<Self, DecompileError> {
        let set = InstructionSet::for_target(version, variant)
            .ok_or(ConfigError::UnsupportedVersion { version, variant })?;
        let generator = Generator::new(version, config.gen)?;
        Ok(Decompiler {
            version,
            variant,
            set,
            generator,
            config,
        })
    }

    pub fn config(&self) -> &DecompileConfig {
        &self.config
    }

    /// Scan, assemble, parse and transform one code object.
    #[tracing::instrument(level = "debug", skip_all, fields(code = %code.name, ?mode))]
    pub fn front(&self, code: &CodeObject, mode: CompileMode) -> Result<Parsed, DecompileError> {
        let scanned = scan(code, &self.set, &self.config.scan)?;
        let target = Target {
            version: self.version,
            variant: self.variant,
            mode,
        };
        let grammar = assemble(target, &scanned.tokens, &scanned.arities)?;
        let parse_config = ParseConfig {
            show_context: self.config.show_context,
        };
        let tree = parse(&grammar, &scanned.tokens, &self.set, parse_config)?;
        Ok(Parsed {
            tree: transform(tree),
            customize: grammar.customize().clone(),
        })
    }

    /// Source text for a module-level (or any `exec`-mode) code object.
    pub fn decompile_code(&self, code: &Arc<CodeObject>) -> Result<Generated, DecompileError> {
        let Parsed { tree, customize } = self.front(code, CompileMode::Exec)?;
        self.generator
            .generate(&tree, Arc::clone(code), customize, self)
    }
}

impl NestedDecompiler for Decompiler {
    type Error = DecompileError;

    fn parse_nested(&self, code: &CodeObject, mode: CompileMode) -> Result<Parsed, DecompileError> {
        self.front(code, mode)
    }
}

/// Decompile one artifact: header (if configured) followed by the body.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(version = %artifact.version, variant = %artifact.variant)
)]
pub fn decompile(artifact: &Artifact, config: &DecompileConfig) -> Result<Decompiled, DecompileError> {
    let decompiler = Decompiler::new(artifact.version, artifact.variant, *config)?;
    let body = decompiler.decompile_code(&artifact.code)?;
    let mut text = if config.header {
        header(artifact)
    } else {
        String::new()
    };
    text.push_str(&body.text);
    Ok(Decompiled {
        text,
        line_map: body.line_map,
    })
}
