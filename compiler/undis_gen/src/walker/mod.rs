//! Tree walker: interprets templates and dispatches custom handlers.

mod code;
mod expressions;
mod statements;

use std::sync::Arc;

use undis_grammar::{CompileMode, CustomizeMap};
use undis_ir::{Child, CodeObject, Node, Token};
use undis_stack::ensure_sufficient_stack;

use crate::emitter::StringEmitter;
use crate::precedence::{self, ITEM};
use crate::template::{Custom, Format, Piece, Template, TemplateTable};
use crate::{GenConfig, Generated, InternalError, NestedDecompiler, Parsed};

/// Result of a rendering step.
pub(crate) type Out<N, T = ()> = Result<T, <N as NestedDecompiler>::Error>;

/// The code object whose tree is being rendered.
pub(crate) struct Frame {
    code: Arc<CodeObject>,
    customize: CustomizeMap,
}

impl Frame {
    pub(crate) fn new(code: Arc<CodeObject>, customize: CustomizeMap) -> Self {
        Frame { code, customize }
    }
}

pub(crate) struct Walker<'g, N> {
    table: &'g TemplateTable,
    config: GenConfig,
    nested: &'g N,
    out: StringEmitter,
    indent: usize,
    top: Frame,
    /// Nested code objects currently being rendered, innermost last.
    frames: Vec<Frame>,
    line_map: Vec<(u32, usize)>,
}

fn child_at(node: &Node, index: usize) -> Result<&Child, InternalError> {
    node.child(index).ok_or_else(|| InternalError::ChildOutOfRange {
        kind: node.kind.clone(),
        index,
        len: node.len(),
    })
}

fn node_at(node: &Node, index: usize) -> Result<&Node, InternalError> {
    child_at(node, index)?
        .as_node()
        .ok_or_else(|| InternalError::shape(&node.kind, "a node child"))
}

fn token_at(node: &Node, index: usize) -> Result<&Token, InternalError> {
    child_at(node, index)?
        .as_token()
        .ok_or_else(|| InternalError::shape(&node.kind, "a token child"))
}

impl<'g, N: NestedDecompiler> Walker<'g, N> {
    pub(crate) fn new(table: &'g TemplateTable, config: GenConfig, nested: &'g N, top: Frame) -> Self {
        Walker {
            table,
            config,
            nested,
            out: StringEmitter::with_capacity(256),
            indent: 0,
            top,
            frames: Vec::new(),
            line_map: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Generated {
        Generated {
            text: self.out.output(),
            line_map: self.line_map,
        }
    }

    fn frame(&self) -> &Frame {
        self.frames.last().unwrap_or(&self.top)
    }

    /// Render `node`, parenthesized if it binds looser than `threshold`.
    pub(crate) fn node(&mut self, node: &Node, threshold: u8) -> Out<N> {
        ensure_sufficient_stack(|| {
            let wrap = precedence::of(node).is_some_and(|prec| prec < threshold);
            if wrap {
                self.out.emit("(");
            }
            let table = self.table;
            match table.get(&node.kind) {
                Some(Format::Template(template)) => self.template(node, template)?,
                Some(Format::Custom(custom)) => self.custom(node, *custom)?,
                None => {
                    return Err(InternalError::MissingTemplate {
                        kind: node.kind.clone(),
                    }
                    .into())
                }
            }
            if wrap {
                self.out.emit(")");
            }
            Ok(())
        })
    }

    fn child(&mut self, child: &Child, threshold: u8) -> Out<N> {
        match child {
            Child::Node(node) => self.node(node, threshold),
            Child::Token(tok) => {
                self.out.emit(&tok.pattr);
                Ok(())
            }
        }
    }

    /// `children` separated by `, `.
    fn items(&mut self, children: &[Child]) -> Out<N> {
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            self.child(child, ITEM)?;
        }
        Ok(())
    }

    /// Render into a separate buffer and return the text.
    fn capture(&mut self, render: impl FnOnce(&mut Self) -> Out<N>) -> Out<N, String> {
        let saved = std::mem::take(&mut self.out);
        let result = render(self);
        let captured = std::mem::replace(&mut self.out, saved);
        result.map(|()| captured.output())
    }

    fn text(&mut self, child: &Child, threshold: u8) -> Out<N, String> {
        self.capture(|w| w.child(child, threshold))
    }

    fn indent_line(&mut self) {
        self.out.emit_indent(self.indent * self.config.indent_width);
    }

    fn template(&mut self, node: &Node, template: &Template) -> Out<N> {
        for piece in template.pieces() {
            match *piece {
                Piece::Text(text) => self.out.emit(text),
                Piece::Indent => self.indent_line(),
                Piece::Push => self.indent += 1,
                Piece::Pop => self.indent = self.indent.saturating_sub(1),
                Piece::Child { index, threshold } => self.child(child_at(node, index)?, threshold)?,
                Piece::Run { start, end } => {
                    let run = end
                        .resolve(node.len())
                        .and_then(|end| node.children.get(start..end))
                        .ok_or_else(|| InternalError::ChildOutOfRange {
                            kind: node.kind.clone(),
                            index: start,
                            len: node.len(),
                        })?;
                    self.items(run)?;
                }
                Piece::Attr(index) => {
                    let tok = token_at(node, index)?;
                    self.out.emit(&tok.pattr);
                }
            }
        }
        Ok(())
    }

    /// Render `node` with the template registered under `kind` rather than
    /// its own.
    fn template_named(&mut self, kind: &'static str, node: &Node) -> Out<N> {
        let table = self.table;
        match table.get(kind) {
            Some(Format::Template(template)) => self.template(node, template),
            _ => Err(InternalError::MissingTemplate {
                kind: kind.to_owned(),
            }
            .into()),
        }
    }

    fn custom(&mut self, node: &Node, custom: Custom) -> Out<N> {
        match custom {
            Custom::Stmts => self.suite(node),
            Custom::Stmt => self.stmt(node),
            Custom::Each => {
                for child in &node.children {
                    self.child(child, 0)?;
                }
                Ok(())
            }
            Custom::Target => self.target(node),
            Custom::Delete => self.delete(node),
            Custom::Unpack => self.unpack(node),
            Custom::Import => self.import(node),
            Custom::ImportFrom => self.import_from(node, false),
            Custom::ImportStar => self.import_from(node, true),
            Custom::FunctionDef => self.function_def(node),
            Custom::ClassDef => self.class_def(node),
            Custom::Docstring => self.docstring(node),
            Custom::Assert => self.assert(node),
            Custom::Test => self.test(node),
            Custom::Operator => self.operator(node),
            Custom::Binary => self.binary(node),
            Custom::Sequence(open, close) => self.sequence(node, open, close),
            Custom::Unpacking(open, close, kind) => self.unpacking(node, open, close, kind),
            Custom::Dict => self.dict(node),
            Custom::DictUnpack => self.dict_unpack(node),
            Custom::Slice => self.slice(node),
            Custom::CallKw => self.call_kw(node),
            Custom::CallEx => self.call_ex(node),
            Custom::Yield => self.yield_expr(node),
            Custom::Lambda => self.lambda(node),
            Custom::Comprehension(open, close) => self.comprehension(node, open, close),
            Custom::JoinedStr => self.joined_str(node),
            Custom::FormattedValue => self.formatted_value(node),
        }
    }

    /// Parse a nested code object and render it with `render`, with that
    /// object as the current frame.
    fn with_nested<T>(
        &mut self,
        code: &Arc<CodeObject>,
        mode: CompileMode,
        render: impl FnOnce(&mut Self, &Node) -> Out<N, T>,
    ) -> Out<N, T> {
        tracing::trace!(code = %code.name, ?mode, "entering nested code object");
        let Parsed { tree, customize } = self.nested.parse_nested(code, mode)?;
        self.frames.push(Frame::new(Arc::clone(code), customize));
        let result = render(self, &tree);
        self.frames.pop();
        result
    }
}
