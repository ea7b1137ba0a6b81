//! Structural feature extractor
//!
//! Tree strategy: one depth-first pass over the parse tree with a loop-depth
//! accumulator, counting nodes by exact kind from the language's
//! [`NodeRules`](crate::language::NodeRules). Text strategy: word-boundary
//! counts over the lower-cased source.

use crate::language::Language;
use crate::models::ParsedFeatures;
use crate::tree::{ParseStrategy, SyntaxNode, SyntaxTree};
use crate::validation::syntax::python_compile_check;
use crate::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref TEXT_LOOP_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bfor\b").unwrap(),
        Regex::new(r"\bwhile\b").unwrap(),
        Regex::new(r"\bdo\b").unwrap(),
        Regex::new(r"\brange\b").unwrap(),
    ];
    static ref TEXT_CONDITIONAL_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bif\b").unwrap(),
        Regex::new(r"\belse if\b").unwrap(),
        Regex::new(r"\bswitch\b").unwrap(),
        Regex::new(r"\bcase\b").unwrap(),
    ];
    static ref TEXT_FUNCTION_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bdef\b").unwrap(),
        Regex::new(r"\bfunc\b").unwrap(),
        Regex::new(r"\bfunction\b").unwrap(),
        Regex::new(r"\b[A-Za-z_]\w*\s*\([^)]*\)\s*\{").unwrap(),
    ];
}

const COMMENT_MARKERS: [&str; 3] = ["#", "//", "/*"];

#[derive(Debug, Default)]
struct TreeCounts {
    functions: usize,
    loops: usize,
    conditionals: usize,
    comments: usize,
    max_loop_depth: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract features; the strategy follows from whether `tree` is present.
    ///
    /// # Errors
    ///
    /// `Error::EmptyInput` for blank input; `Error::Syntax` when Python text
    /// fails the compile check in the text strategy.
    pub fn extract(
        &self,
        code: &str,
        language: Language,
        tree: Option<&SyntaxTree>,
    ) -> Result<ParsedFeatures> {
        if code.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let line_count = non_blank_lines(code);
        let strategy = ParseStrategy::of(tree);
        debug!("Extracting {} features with {} strategy", language, strategy);

        match tree {
            Some(tree) => Ok(Self::from_tree(&tree.root, language, line_count)),
            None => Self::from_text(code, language, line_count),
        }
    }

    fn from_tree(root: &SyntaxNode, language: Language, line_count: usize) -> ParsedFeatures {
        let rules = language.rules();
        let mut counts = TreeCounts::default();

        fn visit(
            node: &SyntaxNode,
            depth: usize,
            rules: &crate::language::NodeRules,
            counts: &mut TreeCounts,
        ) {
            let mut next_depth = depth;
            if node.is_named {
                let kind = node.kind.as_str();
                if rules.is_function(kind) {
                    counts.functions += 1;
                }
                if rules.is_loop(kind) {
                    counts.loops += 1;
                    next_depth += 1;
                    counts.max_loop_depth = counts.max_loop_depth.max(next_depth);
                }
                if rules.is_conditional(kind) {
                    counts.conditionals += 1;
                }
                if rules.is_comment(kind) {
                    counts.comments += 1;
                }
            }
            for child in &node.children {
                visit(child, next_depth, rules, counts);
            }
        }

        visit(root, 0, rules, &mut counts);

        ParsedFeatures::from_counts(
            line_count,
            counts.loops,
            counts.max_loop_depth,
            counts.functions,
            counts.conditionals,
            counts.comments,
        )
    }

    fn from_text(code: &str, language: Language, line_count: usize) -> Result<ParsedFeatures> {
        if language == Language::Python {
            if let Some(error) = python_compile_check(code) {
                return Err(error.into());
            }
        }

        let text = code.to_lowercase();
        let count = |patterns: &[Regex]| -> usize {
            patterns
                .iter()
                .map(|pattern| pattern.find_iter(&text).count())
                .sum()
        };

        let loops = count(&TEXT_LOOP_PATTERNS);
        let conditionals = count(&TEXT_CONDITIONAL_PATTERNS);
        let functions = count(&TEXT_FUNCTION_PATTERNS);
        let comments = code
            .lines()
            .map(str::trim)
            .filter(|line| COMMENT_MARKERS.iter().any(|marker| line.starts_with(marker)))
            .count();

        let nested_depth = match loops {
            0 => 0,
            1 => 1,
            _ => 2,
        };

        Ok(ParsedFeatures::from_counts(
            line_count,
            loops,
            nested_depth,
            functions,
            conditionals,
            comments,
        ))
    }
}

fn non_blank_lines(code: &str) -> usize {
    code.lines().filter(|line| !line.trim().is_empty()).count()
}
