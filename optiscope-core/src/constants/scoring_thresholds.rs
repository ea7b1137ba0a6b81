//! Quality Scoring Thresholds
//!
//! Weights, penalties and suggestion triggers used by the quality scorer.

use crate::models::BigO;

/// Sub-score weights and penalties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringThresholds;

impl ScoringThresholds {
    /// Readability
    pub const COMMENT_RATIO_TARGET: f64 = 0.15;    // Ratio that earns the full comment share
    pub const COMMENT_WEIGHT: f64 = 55.0;
    pub const NAMING_WEIGHT: f64 = 45.0;
    pub const IDEAL_IDENTIFIER_LENGTH: f64 = 8.0;
    pub const NAMING_PENALTY_PER_CHAR: f64 = 4.0;

    /// Maintainability
    pub const MAINTAINABILITY_BASE: f64 = 100.0;
    pub const CYCLOMATIC_PENALTY: f64 = 3.5;
    pub const NESTING_PENALTY: f64 = 12.0;

    /// Safety
    pub const SAFETY_BASE: f64 = 82.0;
    pub const ERROR_HANDLING_BONUS: f64 = 10.0;
    pub const RISKY_CALL_PENALTY: f64 = 12.0;
    pub const BRANCHY_CONDITIONALS: usize = 10;     // More than this costs BRANCHY_PENALTY
    pub const BRANCHY_PENALTY: f64 = 6.0;
    pub const DEEP_NESTING: usize = 3;              // At or above this costs DEEP_NESTING_PENALTY
    pub const DEEP_NESTING_PENALTY: f64 = 8.0;

    /// Efficiency score for labels outside the fixed scale
    pub const EFFICIENCY_FALLBACK: f64 = 55.0;

    /// Efficiency lookup by complexity class
    pub fn efficiency_for(complexity: BigO) -> f64 {
        match complexity {
            BigO::Constant => 98.0,
            BigO::Logarithmic => 92.0,
            BigO::Linear => 82.0,
            BigO::Linearithmic => 72.0,
            BigO::Quadratic => 50.0,
            BigO::Cubic => 35.0,
            BigO::Exponential => 15.0,
            BigO::Polynomial(_) | BigO::PolynomialLog(_) => Self::EFFICIENCY_FALLBACK,
        }
    }
}

/// Suggestion triggers and list caps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionThresholds;

impl SuggestionThresholds {
    pub const READABILITY_FLOOR: f64 = 60.0;
    pub const MAINTAINABILITY_FLOOR: f64 = 65.0;
    pub const EFFICIENCY_FLOOR: f64 = 65.0;
    pub const SAFETY_FLOOR: f64 = 65.0;
    pub const COMMENT_RATIO_FLOOR: f64 = 0.05;

    pub const MAX_QUALITY_SUGGESTIONS: usize = 6;
    pub const MAX_SUGGESTIONS: usize = 8;          // After logic warnings are prepended
    pub const MAX_EXTRA_ISSUES: usize = 8;
    pub const MAX_UNUSED_NAMES: usize = 5;
}
