//! Parse trees.
//!
//! Every node owns its children outright; tokens are leaves reachable by
//! exactly one path. The transform stage relabels and regroups nodes but
//! never creates tokens, so the multiset of leaves is fixed at parse time.

use std::fmt;

use crate::Token;

/// A child of a parse-tree node.
#[derive(Clone, PartialEq, Debug)]
pub enum Child {
    Token(Token),
    Node(Node),
}

impl Child {
    /// Grammar symbol: the token kind or the nonterminal name.
    pub fn kind(&self) -> &str {
        match self {
            Child::Token(tok) => &tok.kind,
            Child::Node(node) => &node.kind,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Child::Token(tok) => Some(tok),
            Child::Node(_) => None,
        }
    }

    pub fn first_token(&self) -> Option<&Token> {
        match self {
            Child::Token(tok) => Some(tok),
            Child::Node(node) => node.first_token(),
        }
    }

    pub fn last_token(&self) -> Option<&Token> {
        match self {
            Child::Token(tok) => Some(tok),
            Child::Node(node) => node.last_token(),
        }
    }
}

/// An interior parse-tree node.
#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    pub kind: String,
    pub children: Vec<Child>,
    /// Name of the rewrite that produced this node, if any.
    pub transformed_by: Option<&'static str>,
}

impl Node {
    pub fn new(kind: impl Into<String>, children: Vec<Child>) -> Self {
        Node {
            kind: kind.into(),
            children,
            transformed_by: None,
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, index: usize) -> Option<&Child> {
        self.children.get(index)
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.children.get(index).and_then(Child::as_node)
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.children.get(index).and_then(Child::as_token)
    }

    /// Follow a path of child indices through nested nodes.
    pub fn descend(&self, path: &[usize]) -> Option<&Child> {
        let (&last, init) = path.split_last()?;
        let mut node = self;
        for &index in init {
            node = node.node(index)?;
        }
        node.child(last)
    }

    /// Leftmost leaf.
    pub fn first_token(&self) -> Option<&Token> {
        self.children.iter().find_map(Child::first_token)
    }

    /// Rightmost leaf.
    pub fn last_token(&self) -> Option<&Token> {
        self.children.iter().rev().find_map(Child::last_token)
    }

    /// All leaves in order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        let mut stack: Vec<&Child> = self.children.iter().rev().collect();
        while let Some(child) = stack.pop() {
            match child {
                Child::Token(tok) => out.push(tok),
                Child::Node(node) => stack.extend(node.children.iter().rev()),
            }
        }
        out
    }

    /// First source line carried by any leaf.
    pub fn linestart(&self) -> Option<u32> {
        self.tokens().into_iter().find_map(|tok| tok.linestart)
    }

    /// Number of nested levels of nodes with this node's kind directly
    /// under it on its rightmost edge.
    pub fn right_chain_depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Some(Child::Node(last)) = node.children.last() {
            if last.kind != self.kind {
                break;
            }
            depth += 1;
            node = last;
        }
        depth
    }
}

impl fmt::Display for Node {
    /// Indented dump, one symbol per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        let mut stack: Vec<(usize, &Child)> = self.children.iter().rev().map(|c| (1, c)).collect();
        while let Some((depth, child)) = stack.pop() {
            let pad = "  ".repeat(depth);
            match child {
                Child::Token(tok) => {
                    writeln!(f, "{pad}{} {} @{}", tok.kind, tok.pattr, tok.offset)?;
                }
                Child::Node(node) => {
                    writeln!(f, "{pad}{}", node.kind)?;
                    stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
