//! Deterministic rewrite rules
//!
//! Each rule is a pure function of the source text. The pipeline runs the
//! enabled rules in a fixed order, feeding each one the output of the last,
//! and collects the notes of the rules that fired.

use crate::config::RuleToggles;
use crate::types::{Candidate, CandidateOrigin, RewriteKind};
use crate::Result;
use optiscope_core::Language;
use tracing::debug;

pub mod blank_lines;
pub mod conditionals;
pub mod membership;
pub mod memoize;
pub mod three_sum;

pub use blank_lines::BlankLineNormalizer;
pub use conditionals::RedundantConditionalRemover;
pub use membership::{MembershipSetRewriter, RepeatedMembershipRewriter};
pub use memoize::MemoizationRewriter;
pub use three_sum::ThreeSumRewriter;

/// Output of a single rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub code: String,
    pub changed: bool,
}

impl Rewrite {
    pub fn unchanged(code: &str) -> Self {
        Self {
            code: code.to_string(),
            changed: false,
        }
    }

    pub fn changed(code: String) -> Self {
        Self {
            code,
            changed: true,
        }
    }
}

pub trait Transformer: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> RewriteKind;

    /// Python-only unless overridden
    fn applies_to(&self, language: Language) -> bool {
        language == Language::Python
    }

    /// Note recorded when the rule changes the code
    fn note(&self) -> Option<&'static str> {
        self.kind().note()
    }

    /// Rewrite `code`, reporting whether anything changed.
    ///
    /// # Errors
    ///
    /// Fails when the rule cannot complete its rewrite; the pipeline then
    /// drops the whole candidate.
    fn apply(&self, code: &str) -> Result<Rewrite>;
}

fn build(kind: RewriteKind) -> Box<dyn Transformer> {
    match kind {
        RewriteKind::ThreeSum => Box::new(ThreeSumRewriter),
        RewriteKind::MembershipSet => Box::new(MembershipSetRewriter),
        RewriteKind::RepeatedMembership => Box::new(RepeatedMembershipRewriter),
        RewriteKind::Memoization => Box::new(MemoizationRewriter),
        RewriteKind::RedundantConditional => Box::new(RedundantConditionalRemover),
        RewriteKind::BlankLines => Box::new(BlankLineNormalizer),
    }
}

/// Ordered rule list
#[derive(Debug)]
pub struct RulePipeline {
    rules: Vec<Box<dyn Transformer>>,
}

impl Default for RulePipeline {
    fn default() -> Self {
        Self::from_toggles(&RuleToggles::default())
    }
}

impl RulePipeline {
    pub fn from_toggles(toggles: &RuleToggles) -> Self {
        Self {
            rules: toggles.enabled().into_iter().map(build).collect(),
        }
    }

    pub fn kinds(&self) -> Vec<RewriteKind> {
        self.rules.iter().map(|rule| rule.kind()).collect()
    }

    /// Run every applicable rule over `code`.
    ///
    /// # Errors
    ///
    /// Propagates the first rule failure.
    pub fn run(&self, code: &str, language: Language) -> Result<Candidate> {
        let mut current = code.to_string();
        let mut notes = Vec::new();

        for rule in self.rules.iter().filter(|rule| rule.applies_to(language)) {
            let rewrite = rule.apply(&current)?;
            if rewrite.changed {
                debug!("Rule {} rewrote the snippet", rule.kind());
                if let Some(note) = rule.note() {
                    notes.push(note.to_string());
                }
            }
            current = rewrite.code;
        }

        Ok(Candidate {
            origin: CandidateOrigin::Rules,
            code: current,
            notes,
        })
    }
}
