//! Rewrite Types and Optimization Results
//!
//! Candidate rewrites, the kinds of rule that produce them and the payload
//! returned by the optimization loop.

use optiscope_core::{AnalysisError, AnalysisResult, BigO};
use serde::{Deserialize, Serialize, Serializer};

/// Every deterministic rewrite rule, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteKind {
    /// Brute-force zero-sum triplets to sorted two-pointer search
    ThreeSum,
    /// Nested equality scan to set lookup
    MembershipSet,
    /// Linear `in list` test inside a loop to a precomputed set
    RepeatedMembership,
    /// Two-branch recursion to `functools.lru_cache`
    Memoization,
    /// `if True:` wrapper removal
    RedundantConditional,
    /// Trailing whitespace and blank-line runs
    BlankLines,
}

impl RewriteKind {
    /// Get all rewrite kinds in pipeline order
    pub fn all() -> Vec<RewriteKind> {
        vec![
            RewriteKind::ThreeSum,
            RewriteKind::MembershipSet,
            RewriteKind::RepeatedMembership,
            RewriteKind::Memoization,
            RewriteKind::RedundantConditional,
            RewriteKind::BlankLines,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RewriteKind::ThreeSum => "three_sum",
            RewriteKind::MembershipSet => "membership_set",
            RewriteKind::RepeatedMembership => "repeated_membership",
            RewriteKind::Memoization => "memoization",
            RewriteKind::RedundantConditional => "redundant_conditional",
            RewriteKind::BlankLines => "blank_lines",
        }
    }

    /// Note attached to a candidate when the rule fired
    pub fn note(&self) -> Option<&'static str> {
        match self {
            RewriteKind::ThreeSum => {
                Some("Replaced triple nested brute-force Three Sum with sorted two-pointer strategy.")
            }
            RewriteKind::MembershipSet => {
                Some("Nested loop replaced with set lookup to reduce O(n^2) scans.")
            }
            RewriteKind::RepeatedMembership => {
                Some("Repeated linear membership checks replaced with precomputed set lookup.")
            }
            RewriteKind::Memoization => Some("Two-branch recursion optimized with memoization."),
            RewriteKind::RedundantConditional => Some("Removed redundant conditional branches."),
            RewriteKind::BlankLines => None,
        }
    }
}

impl std::fmt::Display for RewriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateOrigin {
    Generative,
    Rules,
}

impl std::fmt::Display for CandidateOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateOrigin::Generative => write!(f, "generative"),
            CandidateOrigin::Rules => write!(f, "rules"),
        }
    }
}

/// An unverified rewrite and the notes explaining it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub origin: CandidateOrigin,
    pub code: String,
    pub notes: Vec<String>,
}

pub const GENERATIVE_NOTE: &str = "AI refactor applied with complexity-reduction objective.";

impl Candidate {
    pub fn generative(code: String) -> Self {
        Self {
            origin: CandidateOrigin::Generative,
            code,
            notes: vec![GENERATIVE_NOTE.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationType {
    #[serde(rename = "algorithmic improvement")]
    AlgorithmicImprovement,
    #[serde(rename = "no complexity improvement")]
    NoComplexityImprovement,
}

impl OptimizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationType::AlgorithmicImprovement => "algorithmic improvement",
            OptimizationType::NoComplexityImprovement => "no complexity improvement",
        }
    }
}

impl std::fmt::Display for OptimizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Successful optimization payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original_complexity: BigO,
    pub optimized_code: String,
    pub optimized_complexity: BigO,
    /// True iff the optimized class ranks strictly below the original
    pub complexity_improved: bool,
    pub optimization_type: OptimizationType,
    pub original_score: f64,
    pub optimized_score: f64,
    /// Signed delta such as `+0`, `+12.5` or `-3.25`
    pub score_improvement: String,
    pub notes: String,
}

/// Outcome of [`OptimizationEngine::optimize`](crate::OptimizationEngine::optimize)
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizeOutcome {
    Optimized(OptimizationResult),
    /// The original snippet failed analysis
    Rejected(AnalysisError),
}

impl OptimizeOutcome {
    pub fn result(&self) -> Option<&OptimizationResult> {
        match self {
            OptimizeOutcome::Optimized(result) => Some(result),
            OptimizeOutcome::Rejected(_) => None,
        }
    }
}

/// Rejections serialize exactly like an analysis error payload
impl Serialize for OptimizeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            OptimizeOutcome::Optimized(result) => result.serialize(serializer),
            OptimizeOutcome::Rejected(error) => {
                AnalysisResult::Error(error.clone()).serialize(serializer)
            }
        }
    }
}
