//! Static validation
//!
//! [`Validator::parse`] turns raw text into a [`ParsedProgram`] or rejects
//! it with a syntax error; [`Validator::run_logic_checks`] then looks for
//! suspicious constructs in an accepted program.

pub mod logic;
pub mod syntax;

pub use logic::run_logic_checks;
pub use syntax::SyntaxError;

use crate::language::Language;
use crate::models::LogicIssue;
use crate::tree::{ParseStrategy, SyntaxTree, TreeProvider};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// A snippet that passed syntactic validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProgram {
    pub language: Language,
    pub code: String,
    /// `None` in the text strategy
    pub tree: Option<SyntaxTree>,
}

impl ParsedProgram {
    pub fn strategy(&self) -> ParseStrategy {
        ParseStrategy::of(self.tree.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct Validator {
    provider: Arc<dyn TreeProvider>,
}

impl Validator {
    pub fn new(provider: Arc<dyn TreeProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn TreeProvider> {
        &self.provider
    }

    /// Validate and parse a snippet.
    ///
    /// # Errors
    ///
    /// `Error::EmptyInput` for blank input, `Error::Syntax` when the bracket
    /// gate, the parse tree or the Python compile check rejects the text.
    pub fn parse(&self, code: &str, language: Language) -> Result<ParsedProgram> {
        if code.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        if let Some(error) = syntax::check_brackets(code, language) {
            return Err(error.into());
        }

        let tree = self.provider.parse(language, code);
        match &tree {
            Some(tree) => {
                if let Some(error) = syntax::tree_error(&tree.root) {
                    return Err(error.into());
                }
            }
            None => {
                debug!("No parse tree for {}; using text strategy", language);
                if language == Language::Python {
                    if let Some(error) = syntax::python_compile_check(code) {
                        return Err(error.into());
                    }
                }
            }
        }

        Ok(ParsedProgram {
            language,
            code: code.to_string(),
            tree,
        })
    }

    pub fn run_logic_checks(&self, program: &ParsedProgram) -> Vec<LogicIssue> {
        run_logic_checks(program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NoTreeProvider, TreeSitterProvider};

    fn tree_validator() -> Validator {
        Validator::new(Arc::new(TreeSitterProvider::new()))
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            tree_validator().parse("  \n\t", Language::Python),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_tree_syntax_error() {
        let result = tree_validator().parse("def broken(:\n    return 1", Language::Python);
        match result {
            Err(Error::Syntax { message, line }) => {
                assert_eq!(message, "Invalid syntax: unbalanced parentheses.");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_tree_error_node() {
        let result = tree_validator().parse("int main() {\n  int x = ;\n}\n", Language::C);
        match result {
            Err(Error::Syntax { message, line }) => {
                assert_eq!(message, "Invalid syntax");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_strategies() {
        let program = tree_validator()
            .parse("x = 1\n", Language::Python)
            .expect("valid");
        assert_eq!(program.strategy(), ParseStrategy::Tree);

        let program = Validator::new(Arc::new(NoTreeProvider))
            .parse("int x = 1;\n", Language::C)
            .expect("valid");
        assert_eq!(program.strategy(), ParseStrategy::Text);
    }

    #[test]
    fn test_text_strategy_python_compile_check() {
        let result = Validator::new(Arc::new(NoTreeProvider)).parse("if x\n    y = 1\n", Language::Python);
        assert!(matches!(result, Err(Error::Syntax { .. })));
    }
}
