//! Owned parse trees
//!
//! Analysis never touches a grammar library directly. A [`TreeProvider`]
//! turns source text into a [`SyntaxTree`] of owned [`SyntaxNode`]s (kind,
//! flags, byte range, start point, ordered children and the field each child
//! hangs under), or declines, in which case the engine drops to the
//! [`ParseStrategy::Text`] heuristics.

mod provider;

pub use provider::{NoTreeProvider, TreeSitterProvider};

use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Zero-based row/column position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub kind: String,
    /// Field name under which this node hangs in its parent
    pub field: Option<String>,
    pub is_named: bool,
    pub is_error: bool,
    pub is_missing: bool,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_point: Point,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// 1-based line of the node start
    pub fn line(&self) -> usize {
        self.start_point.row + 1
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Slice of `source` covered by this node (empty when out of range)
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start_byte..self.end_byte).unwrap_or("")
    }

    pub fn child_by_field(&self, name: &str) -> Option<&SyntaxNode> {
        self.children
            .iter()
            .find(|child| child.field.as_deref() == Some(name))
    }

    pub fn named_children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter(|child| child.is_named)
    }

    /// Pre-order walk collecting this node and all descendants
    pub fn walk<'a>(&'a self, acc: &mut Vec<&'a SyntaxNode>) {
        acc.push(self);
        for child in &self.children {
            child.walk(acc);
        }
    }

    pub fn descendants(&self) -> Vec<&SyntaxNode> {
        let mut acc = Vec::new();
        self.walk(&mut acc);
        acc
    }

    /// True when this node or any descendant satisfies `predicate`
    pub fn any(&self, predicate: &dyn Fn(&SyntaxNode) -> bool) -> bool {
        predicate(self) || self.children.iter().any(|child| child.any(predicate))
    }

    /// Breadth-first walk, matching the visiting order of a level-by-level search
    pub fn breadth_first(&self) -> Vec<&SyntaxNode> {
        let mut order = vec![self];
        let mut cursor = 0;
        while cursor < order.len() {
            let node = order[cursor];
            order.extend(node.children.iter());
            cursor += 1;
        }
        order
    }

    /// First `ERROR` or `MISSING` node in pre-order
    pub fn first_error(&self) -> Option<&SyntaxNode> {
        if self.is_error || self.is_missing {
            return Some(self);
        }
        self.children.iter().find_map(SyntaxNode::first_error)
    }
}

/// A parsed snippet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}

impl SyntaxTree {
    pub fn new(root: SyntaxNode) -> Self {
        Self { root }
    }

    pub fn has_error(&self) -> bool {
        self.root.first_error().is_some()
    }
}

/// Source of parse trees for a language
pub trait TreeProvider: Send + Sync + std::fmt::Debug {
    /// Parse `code`; `None` means no tree is available for this language
    fn parse(&self, language: Language, code: &str) -> Option<SyntaxTree>;
}

/// How a snippet is analyzed, decided once per parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    Tree,
    Text,
}

impl ParseStrategy {
    pub fn of(tree: Option<&SyntaxTree>) -> Self {
        if tree.is_some() {
            ParseStrategy::Tree
        } else {
            ParseStrategy::Text
        }
    }
}

impl std::fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseStrategy::Tree => write!(f, "tree"),
            ParseStrategy::Text => write!(f, "text"),
        }
    }
}
