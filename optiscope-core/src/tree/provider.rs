use super::{Point, SyntaxNode, SyntaxTree, TreeProvider};
use crate::language::Language;
use tracing::debug;
use tree_sitter::{Parser, TreeCursor};

/// Default provider backed by the bundled tree-sitter grammars.
///
/// A fresh `Parser` is created per call, so the provider itself holds no
/// state and can be shared across threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterProvider;

impl TreeSitterProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TreeProvider for TreeSitterProvider {
    fn parse(&self, language: Language, code: &str) -> Option<SyntaxTree> {
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(language.tree_sitter_language()) {
            debug!("Grammar for {} unavailable: {}", language, e);
            return None;
        }

        let tree = parser.parse(code, None)?;
        let mut cursor = tree.walk();
        Some(SyntaxTree::new(convert(&mut cursor, None)))
    }
}

/// Provider that never yields a tree, forcing the text strategy
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTreeProvider;

impl TreeProvider for NoTreeProvider {
    fn parse(&self, _language: Language, _code: &str) -> Option<SyntaxTree> {
        None
    }
}

fn convert(cursor: &mut TreeCursor<'_>, field: Option<&str>) -> SyntaxNode {
    let node = cursor.node();
    let position = node.start_position();

    let mut children = Vec::with_capacity(node.child_count());
    if cursor.goto_first_child() {
        loop {
            let child_field = cursor.field_name();
            children.push(convert(cursor, child_field));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    SyntaxNode {
        kind: node.kind().to_string(),
        field: field.map(str::to_string),
        is_named: node.is_named(),
        is_error: node.is_error(),
        is_missing: node.is_missing(),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        start_point: Point {
            row: position.row,
            column: position.column,
        },
        children,
    }
}
