//! Expression handlers.

use undis_ir::{Child, Constant, Node};

use super::{child_at, node_at, token_at, Out, Walker};
use crate::fstring::{self, Part};
use crate::precedence::{self, ITEM};
use crate::{InternalError, NestedDecompiler};

/// The constant a leaf `expr` loads, if it is one.
fn constant_of(child: &Child) -> Option<&Constant> {
    let node = child.as_node()?;
    if node.len() != 1 {
        return None;
    }
    node.token(0)?.attr.as_const()
}

fn is_none(child: &Child) -> bool {
    constant_of(child).is_some_and(Constant::is_none)
}

/// Text of a `LOAD_STR` leaf.
fn string_of(child: &Child) -> Option<&str> {
    constant_of(child).and_then(Constant::as_str)
}

/// `s`, `r` or `a` from the low bits of a `FORMAT_VALUE` operand.
fn conversion(flags: u32) -> Option<char> {
    match flags & 0x3 {
        1 => Some('s'),
        2 => Some('r'),
        3 => Some('a'),
        _ => None,
    }
}

/// Threshold for expressions inside `{...}` of an f-string.
const FIELD: u8 = 2;

/// Threshold for the operand of `*` or `**` in a display or call.
const STARRED: u8 = 7;

/// Elements of a build node: everything but the build instruction.
fn elements(node: &Node) -> &[Child] {
    node.children.split_last().map_or(&[][..], |(_, elements)| elements)
}

/// The node an `expr` child wraps.
fn inner(child: &Child) -> Option<&Node> {
    child.as_node().and_then(|expr| expr.node(0))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// One entry of a mapping display.
enum Key<'n> {
    Expr(&'n Child),
    Const(&'n Constant),
}

impl Key<'_> {
    /// The key as a keyword argument name, if it can be one.
    fn keyword(&self) -> Option<&str> {
        let text = match self {
            Key::Expr(child) => string_of(child),
            Key::Const(constant) => constant.as_str(),
        }?;
        is_identifier(text).then_some(text)
    }
}

/// Key/value pairs of a `dict` (`BUILD_MAP_n`: keys and values alternate)
/// or a `dict_const` (`BUILD_CONST_KEY_MAP_n`: values, then a tuple
/// constant of keys).
fn entries(node: &Node) -> Result<Vec<(Key<'_>, &Child)>, InternalError> {
    if !node.is("dict_const") {
        return elements(node)
            .chunks(2)
            .map(|pair| match pair {
                [key, value] => Ok((Key::Expr(key), value)),
                _ => Err(InternalError::shape(&node.kind, "key/value pairs")),
            })
            .collect();
    }
    let keys_at = node.len().saturating_sub(2);
    let keys = token_at(node, keys_at)?
        .attr
        .as_const()
        .and_then(Constant::as_tuple)
        .ok_or_else(|| InternalError::shape(&node.kind, "a tuple of keys"))?;
    let values = node.children.get(..keys_at).unwrap_or_default();
    if keys.len() != values.len() {
        return Err(InternalError::shape(&node.kind, "one value per key"));
    }
    Ok(keys.iter().map(Key::Const).zip(values).collect())
}

impl<N: NestedDecompiler> Walker<'_, N> {
    /// `binary_op`, `inplace_op`, `unary_op`.
    pub(super) fn operator(&mut self, node: &Node) -> Out<N> {
        let tok = token_at(node, 0)?;
        let (text, _) = precedence::operator(&tok.kind)
            .ok_or_else(|| InternalError::shape(&node.kind, "a known operator token"))?;
        self.out.emit(text);
        Ok(())
    }

    /// Left-associative except `**`.
    pub(super) fn binary(&mut self, node: &Node) -> Out<N> {
        let op = token_at(node_at(node, 2)?, 0)?;
        let (text, prec) = precedence::operator(&op.kind)
            .ok_or_else(|| InternalError::shape(&node.kind, "a known operator token"))?;
        let (left, right) = if text == "**" {
            (prec + 1, prec)
        } else {
            (prec, prec + 1)
        };
        self.child(child_at(node, 0)?, left)?;
        self.out.emit(" ");
        self.out.emit(text);
        self.out.emit(" ");
        self.child(child_at(node, 1)?, right)
    }

    /// List, set and tuple displays, including folded constant runs.
    pub(super) fn sequence(&mut self, node: &Node, open: &str, close: &str) -> Out<N> {
        if node.children.is_empty() {
            return Err(InternalError::shape(&node.kind, "a build instruction").into());
        }
        self.out.emit(open);
        let count = self.display_items(elements(node), 0)?;
        if open == "(" && count == 1 {
            self.out.emit(",");
        }
        self.out.emit(close);
        Ok(())
    }

    fn separator(&mut self, count: usize) {
        if count > 0 {
            self.out.emit(", ");
        }
    }

    /// Items of a display, continuing a run of `count` already written.
    /// Returns the new count.
    fn display_items(&mut self, items: &[Child], mut count: usize) -> Out<N, usize> {
        for item in items {
            match item {
                Child::Token(tok) if tok.kind == "COLLECTION_START" => {}
                Child::Node(run) if run.is("add_consts") => {
                    for value in &run.children {
                        self.separator(count);
                        self.child(value, ITEM)?;
                        count += 1;
                    }
                }
                item => {
                    self.separator(count);
                    self.child(item, ITEM)?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    /// `[*a, *b]`, `{*a, *b}`, `(*a, *b)`: a literal of the display's own
    /// kind is spliced back in place; anything else is starred.
    pub(super) fn unpacking(
        &mut self,
        node: &Node,
        open: &str,
        close: &str,
        kind: &str,
    ) -> Out<N> {
        self.out.emit(open);
        let count = self.starred(elements(node), kind, 0)?;
        if open == "(" && count == 1 {
            self.out.emit(",");
        }
        self.out.emit(close);
        Ok(())
    }

    /// Starred items; `kind` names the literal spliced in place. Tuple
    /// constants splice too where the result is a tuple.
    fn starred(&mut self, items: &[Child], kind: &str, mut count: usize) -> Out<N, usize> {
        for item in items {
            if let Some(display) = inner(item).filter(|display| display.is(kind)) {
                count = self.display_items(elements(display), count)?;
                continue;
            }
            if kind == "tuple" {
                if let Some(values) = constant_of(item).and_then(Constant::as_tuple) {
                    for value in values {
                        self.separator(count);
                        self.out.emit(&value.repr());
                        count += 1;
                    }
                    continue;
                }
            }
            self.separator(count);
            self.out.emit("*");
            self.child(item, STARRED)?;
            count += 1;
        }
        Ok(count)
    }

    /// `dict` and `dict_const` displays.
    pub(super) fn dict(&mut self, node: &Node) -> Out<N> {
        let entries = entries(node)?;
        self.out.emit("{");
        self.mapping_entries(&entries, 0, false)?;
        self.out.emit("}");
        Ok(())
    }

    /// `{**a, 'k': v}`.
    pub(super) fn dict_unpack(&mut self, node: &Node) -> Out<N> {
        self.out.emit("{");
        self.double_starred(elements(node), 0, false)?;
        self.out.emit("}");
        Ok(())
    }

    /// `key: value` entries, or `key=value` ones for keyword arguments.
    fn mapping_entries(
        &mut self,
        entries: &[(Key<'_>, &Child)],
        mut count: usize,
        keywords: bool,
    ) -> Out<N, usize> {
        for (key, value) in entries {
            self.separator(count);
            match (keywords, key) {
                (true, key) => {
                    self.out.emit(key.keyword().unwrap_or_default());
                    self.out.emit("=");
                }
                (false, Key::Expr(key)) => {
                    self.child(key, ITEM)?;
                    self.out.emit(": ");
                }
                (false, Key::Const(key)) => {
                    self.out.emit(&key.repr());
                    self.out.emit(": ");
                }
            }
            self.child(value, ITEM)?;
            count += 1;
        }
        Ok(count)
    }

    /// Double-starred items. Literal mappings splice back in place: as
    /// `key: value` entries in a display, as `key=value` in a call when
    /// every key can be a keyword.
    fn double_starred(
        &mut self,
        items: &[Child],
        mut count: usize,
        keywords: bool,
    ) -> Out<N, usize> {
        for item in items {
            if let Some(mapping) = inner(item).filter(|m| m.is("dict") || m.is("dict_const")) {
                let entries = entries(mapping)?;
                if !keywords || entries.iter().all(|(key, _)| key.keyword().is_some()) {
                    count = self.mapping_entries(&entries, count, keywords)?;
                    continue;
                }
            }
            self.separator(count);
            self.out.emit("**");
            self.child(item, STARRED)?;
            count += 1;
        }
        Ok(count)
    }

    /// `lower:upper[:step]`, with `None` bounds left empty.
    pub(super) fn slice(&mut self, node: &Node) -> Out<N> {
        for (i, bound) in elements(node).iter().enumerate() {
            if i > 0 {
                self.out.emit(":");
            }
            if !is_none(bound) {
                self.child(bound, 2)?;
            }
        }
        Ok(())
    }

    /// `CALL_FUNCTION_KW_n`: the last names-tuple-length arguments are
    /// keywords.
    pub(super) fn call_kw(&mut self, node: &Node) -> Out<N> {
        let call = token_at(node, node.len().saturating_sub(1))?;
        let arity = self
            .frame()
            .customize
            .get(&call.kind)
            .ok_or_else(|| InternalError::shape(&node.kind, "an arity recorded for the call"))?;
        let names_at = node.len().saturating_sub(2);
        let names = token_at(node, names_at)?
            .attr
            .as_const()
            .and_then(Constant::as_tuple)
            .ok_or_else(|| InternalError::shape(&node.kind, "a tuple of keyword names"))?;
        let args = node.children.get(1..names_at).unwrap_or_default();
        if args.len() != arity as usize || names.len() > args.len() {
            return Err(InternalError::shape(&node.kind, "one argument per counted operand").into());
        }
        let positional = args.len() - names.len();

        self.child(child_at(node, 0)?, 16)?;
        self.out.emit("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            if let Some(name) = i.checked_sub(positional).and_then(|k| names.get(k)) {
                self.out.emit(name.as_str().unwrap_or_default());
                self.out.emit("=");
            }
            self.child(arg, ITEM)?;
        }
        self.out.emit(")");
        Ok(())
    }

    /// `CALL_FUNCTION_EX`: positional arguments come as one iterable (maybe
    /// built by `BUILD_TUPLE_UNPACK_WITH_CALL`), keywords as one mapping
    /// (maybe built by `BUILD_MAP_UNPACK_WITH_CALL`).
    pub(super) fn call_ex(&mut self, node: &Node) -> Out<N> {
        self.child(child_at(node, 0)?, 16)?;
        self.out.emit("(");
        let args = child_at(node, 1)?;
        let args = match inner(args) {
            Some(unpack) if unpack.is("unpack_args") => elements(unpack),
            _ => std::slice::from_ref(args),
        };
        let count = self.starred(args, "tuple", 0)?;
        if node.is("call_ex_kw") {
            let kwargs = child_at(node, 2)?;
            let kwargs = match inner(kwargs) {
                Some(unpack) if unpack.is("unpack_kwargs") => elements(unpack),
                _ => std::slice::from_ref(kwargs),
            };
            self.double_starred(kwargs, count, true)?;
        }
        self.out.emit(")");
        Ok(())
    }

    pub(super) fn yield_expr(&mut self, node: &Node) -> Out<N> {
        let value = child_at(node, 0)?;
        self.out.emit("yield");
        if !is_none(value) {
            self.out.emit(" ");
            self.child(value, ITEM)?;
        }
        Ok(())
    }

    pub(super) fn joined_str(&mut self, node: &Node) -> Out<N> {
        let parts = self.fstring_parts(node)?;
        self.out.emit(&fstring::render(&parts));
        Ok(())
    }

    /// A lone `FORMAT_VALUE`: `f'{x}'`.
    pub(super) fn formatted_value(&mut self, node: &Node) -> Out<N> {
        let field = self.field(node)?;
        self.out.emit(&fstring::render(&[field]));
        Ok(())
    }

    /// Pieces of a `BUILD_STRING_n`.
    fn fstring_parts(&mut self, node: &Node) -> Out<N, Vec<Part>> {
        let pieces = elements(node);
        let mut parts = Vec::with_capacity(pieces.len());
        for piece in pieces {
            if let Some(text) = string_of(piece) {
                parts.push(Part::Literal(text.to_owned()));
                continue;
            }
            match piece.as_node().and_then(|expr| expr.node(0)) {
                Some(value) if value.is("formatted_value") || value.is("formatted_value_attr") => {
                    parts.push(self.field(value)?);
                }
                Some(inner) if inner.is("joined_str") => parts.extend(self.fstring_parts(inner)?),
                _ => parts.push(Part::Field {
                    expr: self.text(piece, FIELD)?,
                    conversion: None,
                    spec: Vec::new(),
                }),
            }
        }
        Ok(parts)
    }

    /// `expr [spec] FORMAT_VALUE`.
    fn field(&mut self, node: &Node) -> Out<N, Part> {
        let flags = token_at(node, node.len().saturating_sub(1))?
            .attr
            .as_int()
            .unwrap_or(0);
        let expr = self.text(child_at(node, 0)?, FIELD)?;
        let spec = if node.is("formatted_value_attr") {
            let spec = child_at(node, 1)?;
            match (string_of(spec), spec.as_node().and_then(|expr| expr.node(0))) {
                (Some(text), _) => vec![Part::Literal(text.to_owned())],
                (None, Some(inner)) if inner.is("joined_str") => self.fstring_parts(inner)?,
                _ => vec![Part::Field {
                    expr: self.text(spec, FIELD)?,
                    conversion: None,
                    spec: Vec::new(),
                }],
            }
        } else {
            Vec::new()
        };
        Ok(Part::Field {
            expr,
            conversion: conversion(flags),
            spec,
        })
    }
}
