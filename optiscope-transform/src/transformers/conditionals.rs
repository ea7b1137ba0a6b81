//! `if True:` wrapper removal

use super::{Rewrite, Transformer};
use crate::types::RewriteKind;
use crate::Result;
use lazy_static::lazy_static;
use optiscope_utils::dedent_block;
use regex::Regex;

lazy_static! {
    static ref IF_TRUE: Regex = Regex::new(r"^(\s*)if\s+True\s*:\s*$").unwrap();
    static ref ELSE_BRANCH: Regex = Regex::new(r"^(else\s*:|elif\b)").unwrap();
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RedundantConditionalRemover;

impl RedundantConditionalRemover {
    /// Replace the wrapper at `at` with its dedented body; `None` when the
    /// wrapper has no body or carries an `else`/`elif` branch.
    fn unwrap_at(lines: &[String], at: usize) -> Option<Vec<String>> {
        let header = IF_TRUE.captures(&lines[at])?;
        let outer = header.get(1).map_or(0, |m| m.len());

        let mut end = at + 1;
        while end < lines.len() && (lines[end].trim().is_empty() || indent_of(&lines[end]) > outer) {
            end += 1;
        }
        while end > at + 1 && lines[end - 1].trim().is_empty() {
            end -= 1;
        }
        if end == at + 1 {
            return None;
        }

        let follows_with_branch = lines[end..]
            .iter()
            .find(|line| !line.trim().is_empty())
            .is_some_and(|line| indent_of(line) == outer && ELSE_BRANCH.is_match(line.trim_start()));
        if follows_with_branch {
            return None;
        }

        let inner = lines[at + 1..end]
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| indent_of(line))
            .min()
            .unwrap_or(outer);
        let body = dedent_block(&lines[at + 1..end].join("\n"), inner - outer);

        let mut out = lines[..at].to_vec();
        out.extend(body.lines().map(str::to_string));
        out.extend_from_slice(&lines[end..]);
        Some(out)
    }
}

impl Transformer for RedundantConditionalRemover {
    fn kind(&self) -> RewriteKind {
        RewriteKind::RedundantConditional
    }

    fn apply(&self, code: &str) -> Result<Rewrite> {
        let mut lines: Vec<String> = code.lines().map(str::to_string).collect();
        let mut changed = false;
        let mut at = 0;

        // nested wrappers land back on `at` after unwrapping
        while at < lines.len() {
            match Self::unwrap_at(&lines, at) {
                Some(next) => {
                    lines = next;
                    changed = true;
                }
                None => at += 1,
            }
        }

        if !changed {
            return Ok(Rewrite::unchanged(code));
        }
        let mut text = lines.join("\n");
        text.push('\n');
        Ok(Rewrite::changed(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_is_removed_and_body_dedented() {
        let code = "def f(x):\n    if True:\n        y = x + 1\n        return y\n";
        let rewrite = RedundantConditionalRemover.apply(code).expect("rule");
        assert!(rewrite.changed);
        assert_eq!(rewrite.code, "def f(x):\n    y = x + 1\n    return y\n");
    }

    #[test]
    fn test_nested_wrappers() {
        let code = "if True:\n    if True:\n        print(1)\nprint(2)\n";
        let rewrite = RedundantConditionalRemover.apply(code).expect("rule");
        assert_eq!(rewrite.code, "print(1)\nprint(2)\n");
    }

    #[test]
    fn test_else_branch_is_kept() {
        let code = "if True:\n    a = 1\nelse:\n    a = 2\n";
        let rewrite = RedundantConditionalRemover.apply(code).expect("rule");
        assert!(!rewrite.changed);
        assert_eq!(rewrite.code, code);
    }

    #[test]
    fn test_blank_lines_inside_body() {
        let code = "if True:\n    a = 1\n\n    b = 2\n\nc = 3\n";
        let rewrite = RedundantConditionalRemover.apply(code).expect("rule");
        assert_eq!(rewrite.code, "a = 1\n\nb = 2\n\nc = 3\n");
    }

    #[test]
    fn test_other_conditions_are_untouched() {
        let code = "if Truthy:\n    a = 1\nif x == True:\n    b = 2\n";
        assert!(!RedundantConditionalRemover.apply(code).expect("rule").changed);
    }
}
