//! Statement handlers.

use undis_ir::{Child, Constant, Node, Token};

use super::{child_at, node_at, token_at, Out, Walker};
use crate::precedence::ITEM;
use crate::{InternalError, NestedDecompiler};

/// Name bound by a simple `store`.
pub(super) fn store_name(store: &Node) -> Result<&str, InternalError> {
    store
        .token(0)
        .map(|tok| tok.pattr.as_str())
        .ok_or_else(|| InternalError::shape(&store.kind, "a plain name target"))
}

/// Relative import level from the `LOAD_CONST` before `IMPORT_NAME`.
fn import_level(tok: &Token) -> usize {
    match tok.attr.as_const() {
        Some(Constant::Int(level)) => usize::try_from(*level).unwrap_or(0),
        _ => 0,
    }
}

/// Triple-quoted spelling of a docstring. Newlines stay literal.
pub(super) fn docstring_literal(doc: &str) -> String {
    let mut body = doc.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");
    if body.ends_with('"') {
        body.pop();
        body.push_str("\\\"");
    }
    format!("\"\"\"{body}\"\"\"")
}

impl<N: NestedDecompiler> Walker<'_, N> {
    /// A statement list; `pass` when nothing in it renders.
    pub(super) fn suite(&mut self, node: &Node) -> Out<N> {
        let before = self.out.len();
        for child in &node.children {
            self.child(child, 0)?;
        }
        if self.out.len() == before {
            self.indent_line();
            self.out.emit("pass\n");
        }
        Ok(())
    }

    pub(super) fn stmt(&mut self, node: &Node) -> Out<N> {
        let (line, before) = (self.out.line(), self.out.len());
        self.child(child_at(node, 0)?, 0)?;
        if self.config.line_map && self.out.len() > before {
            if let Some(source) = node.linestart() {
                self.line_map.push((source, line));
            }
        }
        Ok(())
    }

    /// Assignment and deletion targets.
    pub(super) fn target(&mut self, node: &Node) -> Out<N> {
        match node.children.as_slice() {
            [Child::Token(name)] => self.out.emit(&name.pattr),
            [inner @ Child::Node(_)] => self.child(inner, 0)?,
            [object, Child::Token(attr)] => {
                self.child(object, 16)?;
                self.out.emit(".");
                self.out.emit(&attr.pattr);
            }
            [object, index, Child::Token(_)] => {
                self.child(object, 16)?;
                self.out.emit("[");
                self.child(index, 0)?;
                self.out.emit("]");
            }
            _ => {
                return Err(InternalError::shape(
                    &node.kind,
                    "a name, attribute, subscript or unpack target",
                )
                .into())
            }
        }
        Ok(())
    }

    pub(super) fn delete(&mut self, node: &Node) -> Out<N> {
        self.indent_line();
        self.out.emit("del ");
        self.target(node)?;
        self.out.emit("\n");
        Ok(())
    }

    /// `UNPACK_SEQUENCE_n store...`
    pub(super) fn unpack(&mut self, node: &Node) -> Out<N> {
        let targets = node.children.get(1..).unwrap_or_default();
        self.items(targets)?;
        if targets.len() == 1 {
            self.out.emit(",");
        }
        Ok(())
    }

    pub(super) fn import(&mut self, node: &Node) -> Out<N> {
        let module = token_at(node, 2)?.pattr.as_str();
        let alias = store_name(node_at(node, 3)?)?;
        self.indent_line();
        self.out.emit("import ");
        self.out.emit(module);
        if module.split('.').next() != Some(alias) {
            self.out.emit(" as ");
            self.out.emit(alias);
        }
        self.out.emit("\n");
        Ok(())
    }

    /// `from module import names` or, with `star`, `import *`.
    pub(super) fn import_from(&mut self, node: &Node, star: bool) -> Out<N> {
        let level = import_level(token_at(node, 0)?);
        let module = token_at(node, 2)?.pattr.as_str();
        let mut names = Vec::new();
        if !star {
            for item in &node_at(node, 3)?.children {
                let item = item
                    .as_node()
                    .ok_or_else(|| InternalError::shape("import_froms", "import_from_item nodes"))?;
                let name = token_at(item, 0)?.pattr.as_str();
                let alias = store_name(node_at(item, 1)?)?;
                names.push(if name == alias {
                    name.to_owned()
                } else {
                    format!("{name} as {alias}")
                });
            }
        }
        self.indent_line();
        self.out.emit("from ");
        self.out.emit(&".".repeat(level));
        self.out.emit(module);
        self.out.emit(" import ");
        if star {
            self.out.emit("*");
        } else {
            self.out.emit(&names.join(", "));
        }
        self.out.emit("\n");
        Ok(())
    }

    /// `__doc__ = '...'` at the top of a module or class body.
    pub(super) fn docstring(&mut self, node: &Node) -> Out<N> {
        let doc = node
            .first_token()
            .and_then(|tok| tok.attr.as_const())
            .and_then(Constant::as_str)
            .ok_or_else(|| InternalError::shape(&node.kind, "a string constant"))?;
        let literal = docstring_literal(doc);
        self.indent_line();
        self.out.emit(&literal);
        self.out.emit("\n");
        Ok(())
    }

    /// `assert test[, message]`: the test and message are the `expr`
    /// children, in order.
    pub(super) fn assert(&mut self, node: &Node) -> Out<N> {
        let mut exprs = node.children.iter().filter(|c| c.kind() == "expr");
        let test = exprs
            .next()
            .ok_or_else(|| InternalError::shape(&node.kind, "a test expression"))?;
        self.indent_line();
        self.out.emit("assert ");
        self.child(test, ITEM)?;
        if let Some(message) = exprs.next() {
            self.out.emit(", ");
            self.child(message, ITEM)?;
        }
        self.out.emit("\n");
        Ok(())
    }

    /// A condition that jumps away when false: a single test, or a chain of
    /// `and`/`or` tests sharing one exit.
    pub(super) fn test(&mut self, node: &Node) -> Out<N> {
        let (conds, joiner, threshold) = match node.node(0) {
            Some(conds) if conds.is("and_conds") => (conds, " and ", 4),
            Some(conds) if conds.is("or_conds") => (conds, " or ", 3),
            _ => return self.child(child_at(node, 0)?, 0),
        };
        for cond in &conds.children {
            let cond = cond
                .as_node()
                .ok_or_else(|| InternalError::shape(&conds.kind, "condition nodes"))?;
            self.child(child_at(cond, 0)?, threshold)?;
            self.out.emit(joiner);
        }
        self.child(child_at(node, 1)?, threshold)
    }
}
