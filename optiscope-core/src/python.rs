//! Python module queries
//!
//! A small read-only view over a Python parse tree, used by the extra-issue
//! checks, the missing-print suggestion and the optimizer's I/O preservation.

use crate::language::Language;
use crate::tree::{SyntaxNode, SyntaxTree, TreeProvider, TreeSitterProvider};
use optiscope_utils::squeeze_lowercase;
use std::collections::BTreeSet;

const MAIN_GUARD_DOUBLE: &str = "__name__ == \"__main__\"";
const MAIN_GUARD_SINGLE: &str = "__name__ == '__main__'";

/// An error-free Python parse
#[derive(Debug, Clone)]
pub struct PythonModule {
    source: String,
    tree: SyntaxTree,
}

impl PythonModule {
    /// Parse `code`; `None` when it does not parse cleanly.
    pub fn parse(code: &str) -> Option<Self> {
        let tree = TreeSitterProvider::new().parse(Language::Python, code)?;
        if tree.has_error() {
            return None;
        }
        Some(Self {
            source: code.to_string(),
            tree,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn nodes(&self) -> Vec<&SyntaxNode> {
        self.tree.root.descendants()
    }

    fn text(&self, node: &SyntaxNode) -> &str {
        node.text(&self.source)
    }

    /// Names of every `def`, nested ones included
    pub fn defined_functions(&self) -> BTreeSet<String> {
        self.nodes()
            .into_iter()
            .filter(|node| node.is_kind("function_definition"))
            .filter_map(|node| node.child_by_field("name"))
            .map(|name| self.text(name).to_string())
            .collect()
    }

    /// Callee name of a call node: a bare name, or the attribute of `obj.attr(...)`
    fn callee_name(&self, call: &SyntaxNode) -> Option<String> {
        let function = call.child_by_field("function")?;
        match function.kind.as_str() {
            "identifier" => Some(self.text(function).to_string()),
            "attribute" => function
                .child_by_field("attribute")
                .map(|attribute| self.text(attribute).to_string()),
            _ => None,
        }
    }

    pub fn call_names(&self) -> BTreeSet<String> {
        self.nodes()
            .into_iter()
            .filter(|node| node.is_kind("call"))
            .filter_map(|call| self.callee_name(call))
            .collect()
    }

    /// True when some call invokes the bare name `name` (attribute calls do not count)
    pub fn has_name_call(&self, name: &str) -> bool {
        self.nodes().into_iter().any(|node| {
            node.is_kind("call")
                && node
                    .child_by_field("function")
                    .is_some_and(|function| {
                        function.is_kind("identifier") && self.text(function) == name
                    })
        })
    }

    pub fn has_print(&self) -> bool {
        self.has_name_call("print")
    }

    pub fn has_input(&self) -> bool {
        self.has_name_call("input")
    }

    pub fn has_return(&self) -> bool {
        self.tree.root.any(&|node| node.is_kind("return_statement"))
    }

    /// Name of the first function reached breadth-first
    pub fn first_function(&self) -> Option<String> {
        self.tree
            .root
            .breadth_first()
            .into_iter()
            .find(|node| node.is_kind("function_definition"))
            .and_then(|node| node.child_by_field("name"))
            .map(|name| self.text(name).to_string())
    }

    /// Plain positional parameter names of function `name`
    pub fn parameter_names(&self, name: &str) -> Vec<String> {
        let Some(function) = self.tree.root.breadth_first().into_iter().find(|node| {
            node.is_kind("function_definition")
                && node
                    .child_by_field("name")
                    .is_some_and(|ident| self.text(ident) == name)
        }) else {
            return Vec::new();
        };

        let Some(parameters) = function.child_by_field("parameters") else {
            return Vec::new();
        };

        parameters
            .named_children()
            .filter_map(|param| match param.kind.as_str() {
                "identifier" => Some(self.text(param).to_string()),
                "typed_parameter" => param
                    .named_children()
                    .find(|child| child.is_kind("identifier"))
                    .map(|ident| self.text(ident).to_string()),
                "default_parameter" | "typed_default_parameter" => param
                    .child_by_field("name")
                    .map(|ident| self.text(ident).to_string()),
                _ => None,
            })
            .collect()
    }

    /// A top-level `if __name__ == "__main__":` block
    pub fn has_main_block(&self) -> bool {
        let guards = [
            squeeze_lowercase(MAIN_GUARD_DOUBLE),
            squeeze_lowercase(MAIN_GUARD_SINGLE),
        ];
        self.tree.root.named_children().any(|statement| {
            statement.is_kind("if_statement")
                && statement.child_by_field("condition").is_some_and(|condition| {
                    let squeezed = squeeze_lowercase(self.text(condition));
                    guards.contains(&squeezed)
                })
        })
    }

    /// True when a module-level statement outside any definition calls one of `names`
    pub fn has_top_level_call_to(&self, names: &BTreeSet<String>) -> bool {
        self.tree
            .root
            .named_children()
            .filter(|statement| {
                !matches!(
                    statement.kind.as_str(),
                    "function_definition" | "class_definition" | "decorated_definition"
                )
            })
            .any(|statement| {
                statement.descendants().into_iter().any(|node| {
                    node.is_kind("call")
                        && self
                            .callee_name(node)
                            .is_some_and(|name| names.contains(&name))
                })
            })
    }
}

/// Code returns values but never prints them
pub fn returns_without_print(code: &str) -> bool {
    PythonModule::parse(code).is_some_and(|module| module.has_return() && !module.has_print())
}

/// Textual `__main__` guard check
pub fn has_main_guard_text(code: &str) -> bool {
    code.contains(MAIN_GUARD_SINGLE) || code.contains(MAIN_GUARD_DOUBLE)
}
