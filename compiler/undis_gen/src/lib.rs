//! Template code generator.
//!
//! Walks a transformed parse tree and produces source text. Each node kind
//! renders from a declarative [template](template) or, for the handful of
//! kinds whose text depends on more than child positions, a custom handler.
//!
//! # Precedence
//!
//! The walker carries the minimum precedence the current position tolerates.
//! A node that binds looser than that is wrapped in parentheses; no other
//! code adds parentheses.
//!
//! # Nested code objects
//!
//! Function bodies, lambdas and comprehensions live in separate code objects.
//! When a template needs one, the generator asks its [`NestedDecompiler`] for
//! a fresh parse of that object and renders the result in place, at the
//! current indentation. Nothing is shared between the outer and inner parse.

mod emitter;
mod error;
mod fstring;
mod precedence;
mod template;
mod walker;

use std::sync::Arc;

use undis_grammar::{CompileMode, CustomizeMap};
use undis_ir::{CodeObject, Node, Version};

pub use error::InternalError;

use template::TemplateTable;
use walker::{Frame, Walker};

/// Generator settings.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct GenConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Collect `(source line, output line)` pairs per statement.
    pub line_map: bool,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            indent_width: 4,
            line_map: false,
        }
    }
}

/// Text for one code object.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Generated {
    pub text: String,
    /// `(source line, output line)`, both 1-based, in output order. Empty
    /// unless [`GenConfig::line_map`] is set.
    pub line_map: Vec<(u32, usize)>,
}

/// A parsed and transformed nested code object.
#[derive(Clone, PartialEq, Debug)]
pub struct Parsed {
    pub tree: Node,
    pub customize: CustomizeMap,
}

/// Runs the front half of the pipeline on a nested code object.
pub trait NestedDecompiler {
    type Error: From<InternalError>;

    /// Scan, assemble, parse and transform `code` with its own grammar,
    /// starting from `mode`'s start symbol.
    fn parse_nested(&self, code: &CodeObject, mode: CompileMode) -> Result<Parsed, Self::Error>;
}

/// A template table for one bytecode version plus settings. Reusable across
/// code objects.
pub struct Generator {
    table: TemplateTable,
    config: GenConfig,
}

impl Generator {
    pub fn new(version: Version, config: GenConfig) -> Result<Self, InternalError> {
        Ok(Generator {
            table: TemplateTable::new(version)?,
            config,
        })
    }

    pub fn config(&self) -> GenConfig {
        self.config
    }

    /// Render `tree`, the parse of `code`.
    #[tracing::instrument(level = "debug", skip_all, fields(code = %code.name))]
    pub fn generate<N: NestedDecompiler>(
        &self,
        tree: &Node,
        code: Arc<CodeObject>,
        customize: CustomizeMap,
        nested: &N,
    ) -> Result<Generated, N::Error> {
        let mut walker = Walker::new(&self.table, self.config, nested, Frame::new(code, customize));
        walker.node(tree, 0)?;
        let generated = walker.finish();
        tracing::debug!(bytes = generated.text.len(), "generated");
        Ok(generated)
    }
}
