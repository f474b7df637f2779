//! Handlers that render a nested code object: `def`, `class`, `lambda` and
//! comprehensions.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use undis_grammar::CompileMode;
use undis_ir::{Child, CodeFlags, CodeObject, Constant, Node};

use super::statements::{docstring_literal, store_name};
use super::{child_at, node_at, token_at, Out, Walker};
use crate::precedence::ITEM;
use crate::template::MAP_ENTRY;
use crate::{InternalError, NestedDecompiler};

/// `MAKE_FUNCTION` operand flags.
const DEFAULTS: u32 = 0x01;
const KWDEFAULTS: u32 = 0x02;
const ANNOTATIONS: u32 = 0x04;

/// What a `MAKE_FUNCTION` node carries besides the code itself.
struct FunctionParts<'t> {
    code: Arc<CodeObject>,
    defaults: Option<&'t Child>,
    kwdefaults: Option<&'t Child>,
    annotations: Option<&'t Child>,
}

/// Index of the token loading a code constant.
fn code_load(node: &Node) -> Result<(usize, &Arc<CodeObject>), InternalError> {
    node.children
        .iter()
        .enumerate()
        .find_map(|(i, child)| {
            let code = child.as_token()?.attr.as_const()?.as_code()?;
            Some((i, code))
        })
        .ok_or_else(|| InternalError::shape(&node.kind, "a code object load"))
}

/// Where `FOR_ITER` sits in a comprehension body or clause.
fn for_iter_at(node: &Node) -> Result<usize, InternalError> {
    node.children
        .iter()
        .position(|child| child.as_token().is_some_and(|tok| tok.kind == "FOR_ITER"))
        .ok_or_else(|| InternalError::shape(&node.kind, "a FOR_ITER"))
}

impl<N: NestedDecompiler> Walker<'_, N> {
    fn function_parts<'t>(&self, node: &'t Node) -> Result<FunctionParts<'t>, InternalError> {
        let (load, code) = code_load(node)?;
        let make = token_at(node, load + 2)?;
        let flags = self
            .frame()
            .customize
            .get(&make.kind)
            .or_else(|| make.attr.as_int())
            .ok_or_else(|| InternalError::shape(&node.kind, "MAKE_FUNCTION flags"))?;

        let mut operands = node.children.get(..load).unwrap_or_default().iter();
        let mut take = |bit: u32| {
            if flags & bit == 0 {
                None
            } else {
                operands.next()
            }
        };
        Ok(FunctionParts {
            code: Arc::clone(code),
            defaults: take(DEFAULTS),
            kwdefaults: take(KWDEFAULTS),
            annotations: take(ANNOTATIONS),
        })
    }

    /// Element texts of a tuple, folded or built.
    fn tuple_texts(&mut self, child: &Child) -> Out<N, Vec<String>> {
        let Some(expr) = child.as_node() else {
            return Ok(Vec::new());
        };
        if let Some(values) = expr
            .token(0)
            .and_then(|tok| tok.attr.as_const())
            .and_then(Constant::as_tuple)
        {
            return Ok(values.iter().map(Constant::repr).collect());
        }
        let tuple = expr
            .node(0)
            .filter(|tuple| tuple.is("tuple"))
            .ok_or_else(|| InternalError::shape(&expr.kind, "a tuple of defaults"))?;
        let mut texts = Vec::new();
        for element in tuple.children.split_last().map_or(&[][..], |(_, e)| e) {
            match element {
                Child::Token(tok) if tok.kind == "COLLECTION_START" => {}
                Child::Node(run) if run.is("add_consts") => {
                    texts.extend(run.children.iter().filter_map(Child::as_token).map(|t| t.pattr.clone()));
                }
                element => texts.push(self.text(element, ITEM)?),
            }
        }
        Ok(texts)
    }

    /// Name to value-text pairs of a dict whose keys are string constants.
    fn mapping_texts(&mut self, child: &Child) -> Out<N, FxHashMap<String, String>> {
        let mut map = FxHashMap::default();
        let Some(dict) = child.as_node().and_then(|expr| expr.node(0)) else {
            return Ok(map);
        };
        if dict.is("dict_const") {
            let keys_at = dict.len().saturating_sub(2);
            let keys = token_at(dict, keys_at)?
                .attr
                .as_const()
                .and_then(Constant::as_tuple)
                .ok_or_else(|| InternalError::shape(&dict.kind, "a tuple of keys"))?;
            for (key, value) in keys.iter().zip(dict.children.get(..keys_at).unwrap_or_default()) {
                let text = self.text(value, ITEM)?;
                map.insert(key.as_str().unwrap_or_default().to_owned(), text);
            }
        } else if dict.is("dict") {
            let pairs = dict.children.split_last().map_or(&[][..], |(_, p)| p);
            for pair in pairs.chunks(2) {
                let [key, value] = pair else {
                    return Err(InternalError::shape(&dict.kind, "key/value pairs").into());
                };
                let name = key
                    .as_node()
                    .and_then(|k| k.token(0))
                    .and_then(|tok| tok.attr.as_const())
                    .and_then(Constant::as_str)
                    .unwrap_or_default()
                    .to_owned();
                let text = self.text(value, ITEM)?;
                map.insert(name, text);
            }
        } else {
            return Err(InternalError::shape(&dict.kind, "a dict of names").into());
        }
        Ok(map)
    }

    /// Parameter list, and the return annotation when `annotate` is set.
    fn signature(&mut self, parts: &FunctionParts<'_>, annotate: bool) -> Out<N, (String, Option<String>)> {
        let code = Arc::clone(&parts.code);
        let defaults = match parts.defaults {
            Some(defaults) => self.tuple_texts(defaults)?,
            None => Vec::new(),
        };
        let kwdefaults = match parts.kwdefaults {
            Some(kwdefaults) => self.mapping_texts(kwdefaults)?,
            None => FxHashMap::default(),
        };
        let mut annotations = match parts.annotations {
            Some(annotations) if annotate => self.mapping_texts(annotations)?,
            _ => FxHashMap::default(),
        };

        let names = code.parameter_names();
        let argcount = (code.argcount as usize).min(names.len());
        let kwonly_end = (argcount + code.kwonlyargcount as usize).min(names.len());
        let mut rest = names.get(kwonly_end..).unwrap_or_default().iter();
        let varargs = code.flags.contains(CodeFlags::VARARGS).then(|| rest.next()).flatten();
        let varkw = code.flags.contains(CodeFlags::VARKEYWORDS).then(|| rest.next()).flatten();

        let param = |name: &str, annotations: &mut FxHashMap<String, String>| match annotations.remove(name) {
            Some(ann) => format!("{name}: {ann}"),
            None => name.to_owned(),
        };

        let mut params = Vec::with_capacity(names.len() + 2);
        let first_default = argcount.saturating_sub(defaults.len());
        for (i, name) in names[..argcount].iter().enumerate() {
            let mut text = param(name, &mut annotations);
            if let Some(default) = i.checked_sub(first_default).and_then(|d| defaults.get(d)) {
                text.push_str(if text.contains(':') { " = " } else { "=" });
                text.push_str(default);
            }
            params.push(text);
            if code.posonlyargcount as usize == i + 1 {
                params.push("/".to_owned());
            }
        }
        match varargs {
            Some(name) => params.push(format!("*{}", param(name, &mut annotations))),
            None if kwonly_end > argcount => params.push("*".to_owned()),
            None => {}
        }
        for name in &names[argcount..kwonly_end] {
            let mut text = param(name, &mut annotations);
            if let Some(default) = kwdefaults.get(name.as_str()) {
                text.push_str(if text.contains(':') { " = " } else { "=" });
                text.push_str(default);
            }
            params.push(text);
        }
        if let Some(name) = varkw {
            params.push(format!("**{}", param(name, &mut annotations)));
        }
        Ok((params.join(", "), annotations.remove("return")))
    }

    /// Body of a nested `def` or `class`, one level deeper.
    fn body(&mut self, code: &Arc<CodeObject>, docstring: bool) -> Out<N> {
        self.indent += 1;
        let before = self.out.len();
        let result = self.with_nested(code, CompileMode::Exec, |w, tree| {
            let literal = if docstring {
                w.frame()
                    .code
                    .consts
                    .first()
                    .and_then(Constant::as_str)
                    .map(docstring_literal)
            } else {
                None
            };
            if let Some(literal) = literal {
                w.indent_line();
                w.out.emit(&literal);
                w.out.emit_newline();
            }
            w.node(tree, 0)
        });
        if result.is_ok() && self.out.len() == before {
            self.indent_line();
            self.out.emit("pass\n");
        }
        self.indent = self.indent.saturating_sub(1);
        result
    }

    /// Definitions are set off by a blank line, except at the top of the
    /// output or of a block.
    fn blank_line_before_definition(&mut self) {
        if self.out.len() > 0 && !self.out.ends_with(":\n") {
            self.out.emit_newline();
        }
    }

    /// `function_def ::= mkfunc store`.
    pub(super) fn function_def(&mut self, node: &Node) -> Out<N> {
        let mkfunc = node_at(node, 0)?;
        let name = store_name(node_at(node, 1)?)?.to_owned();
        let parts = self.function_parts(mkfunc)?;
        let (params, returns) = self.signature(&parts, true)?;

        self.blank_line_before_definition();
        self.indent_line();
        self.out.emit("def ");
        self.out.emit(&name);
        self.out.emit("(");
        self.out.emit(&params);
        self.out.emit(")");
        if let Some(returns) = returns {
            self.out.emit(" -> ");
            self.out.emit(&returns);
        }
        self.out.emit(":\n");
        self.body(&parts.code, true)
    }

    /// `classdef ::= build_class store`.
    pub(super) fn class_def(&mut self, node: &Node) -> Out<N> {
        let build = node_at(node, 0)?;
        let name = store_name(node_at(node, 1)?)?.to_owned();
        let (_, code) = code_load(node_at(build, 1)?)?;
        let code = Arc::clone(code);
        let bases = build.children.get(3..build.len().saturating_sub(1)).unwrap_or_default();

        self.blank_line_before_definition();
        self.indent_line();
        self.out.emit("class ");
        self.out.emit(&name);
        if !bases.is_empty() {
            self.out.emit("(");
            self.items(bases)?;
            self.out.emit(")");
        }
        self.out.emit(":\n");
        self.body(&code, false)
    }

    pub(super) fn lambda(&mut self, node: &Node) -> Out<N> {
        let parts = self.function_parts(node)?;
        let (params, _) = self.signature(&parts, false)?;
        self.out.emit("lambda");
        if !params.is_empty() {
            self.out.emit(" ");
            self.out.emit(&params);
        }
        self.out.emit(": ");
        self.with_nested(&parts.code, CompileMode::Lambda, |w, tree| w.node(tree, 0))
    }

    /// `[...]`, `{...}` and `(...)` comprehensions. The iterable lives in the
    /// calling code; everything else in the nested object.
    pub(super) fn comprehension(&mut self, node: &Node, open: &str, close: &str) -> Out<N> {
        let (load, code) = code_load(node)?;
        let code = Arc::clone(code);
        let iterable = self.text(child_at(node, load + 3)?, 3)?;

        self.out.emit(open);
        self.with_nested(&code, CompileMode::Comprehension, |w, tree| {
            let at = for_iter_at(tree)?;
            let target = w.text(child_at(tree, at + 1)?, 0)?;
            let mut clauses = format!(" for {target} in {iterable}");
            let body = w.comp_iter(node_at(tree, at + 2)?, &mut clauses)?;
            w.out.emit(&body);
            w.out.emit(&clauses);
            Ok(())
        })?;
        self.out.emit(close);
        Ok(())
    }

    /// Append the `for`/`if` clauses under `iter` to `clauses` and return
    /// the text of the element expression.
    fn comp_iter(&mut self, iter: &Node, clauses: &mut String) -> Out<N, String> {
        let mut current = iter;
        loop {
            let clause = if current.is("comp_iter") {
                node_at(current, 0)?
            } else {
                current
            };
            match clause.kind.as_str() {
                "comp_if" | "comp_if_not" => {
                    let (prefix, threshold) = if clause.is("comp_if") {
                        (" if ", 3)
                    } else {
                        (" if not ", 5)
                    };
                    clauses.push_str(prefix);
                    clauses.push_str(&self.text(child_at(clause, 0)?, threshold)?);
                    current = node_at(clause, 2)?;
                }
                "comp_for" => {
                    let at = for_iter_at(clause)?;
                    let iterable = self.text(child_at(clause, 0)?, 3)?;
                    let target = self.text(child_at(clause, at + 1)?, 0)?;
                    clauses.push_str(&format!(" for {target} in {iterable}"));
                    current = node_at(clause, at + 2)?;
                }
                "comp_body" => {
                    if clause.token(2).is_some_and(|tok| tok.kind == "MAP_ADD") {
                        return self.capture(|w| w.template_named(MAP_ENTRY, clause));
                    }
                    return self.text(child_at(clause, 0)?, ITEM);
                }
                _ => return Err(InternalError::shape(&clause.kind, "a comprehension clause").into()),
            }
        }
    }
}
