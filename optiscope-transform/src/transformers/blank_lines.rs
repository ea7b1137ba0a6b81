use super::{Rewrite, Transformer};
use crate::types::RewriteKind;
use crate::Result;
use optiscope_core::Language;

/// Strip trailing whitespace, keep at most one blank line in a row and end
/// with exactly one newline. Runs for every language.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankLineNormalizer;

impl BlankLineNormalizer {
    pub fn normalize(code: &str) -> String {
        let mut cleaned: Vec<&str> = Vec::new();
        let mut blank_run = 0;
        for line in code.lines() {
            if line.trim().is_empty() {
                blank_run += 1;
                if blank_run == 1 {
                    cleaned.push("");
                }
            } else {
                blank_run = 0;
                cleaned.push(line.trim_end());
            }
        }
        format!("{}\n", cleaned.join("\n").trim())
    }
}

impl Transformer for BlankLineNormalizer {
    fn kind(&self) -> RewriteKind {
        RewriteKind::BlankLines
    }

    fn applies_to(&self, _language: Language) -> bool {
        true
    }

    fn apply(&self, code: &str) -> Result<Rewrite> {
        let normalized = Self::normalize(code);
        if normalized == code {
            return Ok(Rewrite::unchanged(code));
        }
        Ok(Rewrite::changed(normalized))
    }
}
