//! Quality scoring
//!
//! Four sub-scores in `[0, 100]` (readability, maintainability, efficiency,
//! safety) and their mean, followed by rule-driven improvement suggestions.

pub mod issues;

pub use issues::extra_issues;

use crate::constants::{ScoringThresholds, SuggestionThresholds};
use crate::language::Language;
use crate::models::{BigO, ParsedFeatures, ScoreBreakdown};
use crate::python::returns_without_print;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\b").unwrap();
    static ref ERROR_HANDLING: Regex = Regex::new(r"\b(try|catch|except)\b").unwrap();
    static ref RISKY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\beval\s*\(").unwrap(),
        Regex::new(r"\bexec\s*\(").unwrap(),
        Regex::new(r"\bgoto\b").unwrap(),
        Regex::new(r"\bstrcpy\s*\(").unwrap(),
    ];
}

const NAMING_STOPWORDS: [&str; 7] = ["if", "for", "while", "return", "def", "class", "func"];

const READABILITY_HINT: &str = "Improve naming consistency and add intent-focused comments.";
const MAINTAINABILITY_HINT: &str =
    "Reduce nesting depth and break large logic blocks into smaller functions.";
const EFFICIENCY_HINT: &str = "Optimize core algorithm to reduce time complexity.";
const SAFETY_HINT: &str = "Add robust error handling and remove risky operations.";
const EXPENSIVE_HINT: &str =
    "Current complexity is expensive for scale; consider data-structure changes.";
const COMMENT_HINT: &str = "Comment ratio is low; document non-obvious decisions.";
pub const MISSING_PRINT_HINT: &str = "Output not printed - add print statement.";
pub const HEALTHY_HINT: &str = "Code quality looks healthy. Keep regression tests in place.";

/// Round to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn bounded(value: f64) -> f64 {
    round2(value.clamp(0.0, 100.0))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QualityScorer;

impl QualityScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, code: &str, features: &ParsedFeatures, complexity: BigO) -> ScoreBreakdown {
        let readability = Self::readability(code, features.comment_ratio);
        let maintainability = Self::maintainability(features);
        let efficiency = ScoringThresholds::efficiency_for(complexity);
        let safety = Self::safety(code, features);
        let overall = round2(0.25 * (readability + maintainability + efficiency + safety));

        ScoreBreakdown {
            readability,
            maintainability,
            efficiency,
            safety,
            overall,
        }
    }

    /// Comment share plus a naming share peaking at the ideal identifier length
    pub fn readability(code: &str, comment_ratio: f64) -> f64 {
        let lengths: Vec<usize> = IDENTIFIER
            .find_iter(code)
            .map(|m| m.as_str())
            .filter(|name| !NAMING_STOPWORDS.contains(name))
            .map(str::len)
            .collect();
        let average = lengths.iter().sum::<usize>() as f64 / lengths.len().max(1) as f64;

        let comment_share = (comment_ratio / ScoringThresholds::COMMENT_RATIO_TARGET).min(1.0)
            * ScoringThresholds::COMMENT_WEIGHT;
        let naming_share = (ScoringThresholds::NAMING_WEIGHT
            - (average - ScoringThresholds::IDEAL_IDENTIFIER_LENGTH).abs()
                * ScoringThresholds::NAMING_PENALTY_PER_CHAR)
            .clamp(0.0, ScoringThresholds::NAMING_WEIGHT);

        bounded(comment_share + naming_share)
    }

    pub fn maintainability(features: &ParsedFeatures) -> f64 {
        bounded(
            ScoringThresholds::MAINTAINABILITY_BASE
                - features.cyclomatic_complexity as f64 * ScoringThresholds::CYCLOMATIC_PENALTY
                - features.nested_loop_depth as f64 * ScoringThresholds::NESTING_PENALTY,
        )
    }

    pub fn safety(code: &str, features: &ParsedFeatures) -> f64 {
        let lower = code.to_lowercase();
        let mut safety = ScoringThresholds::SAFETY_BASE;

        if ERROR_HANDLING.is_match(&lower) {
            safety += ScoringThresholds::ERROR_HANDLING_BONUS;
        }

        let risky_hits = RISKY_PATTERNS
            .iter()
            .filter(|pattern| pattern.is_match(&lower))
            .count();
        safety -= risky_hits as f64 * ScoringThresholds::RISKY_CALL_PENALTY;

        if features.conditional_count > ScoringThresholds::BRANCHY_CONDITIONALS {
            safety -= ScoringThresholds::BRANCHY_PENALTY;
        }
        if features.nested_loop_depth >= ScoringThresholds::DEEP_NESTING {
            safety -= ScoringThresholds::DEEP_NESTING_PENALTY;
        }

        bounded(safety)
    }

    /// Suggestions in fixed order, capped; a healthy-code note when none fire
    pub fn suggestions(
        &self,
        code: &str,
        language: Language,
        scores: &ScoreBreakdown,
        complexity: BigO,
        features: &ParsedFeatures,
    ) -> Vec<String> {
        let checks = [
            (scores.readability < SuggestionThresholds::READABILITY_FLOOR, READABILITY_HINT),
            (scores.maintainability < SuggestionThresholds::MAINTAINABILITY_FLOOR, MAINTAINABILITY_HINT),
            (scores.efficiency < SuggestionThresholds::EFFICIENCY_FLOOR, EFFICIENCY_HINT),
            (scores.safety < SuggestionThresholds::SAFETY_FLOOR, SAFETY_HINT),
            (complexity.is_expensive(), EXPENSIVE_HINT),
            (features.comment_ratio < SuggestionThresholds::COMMENT_RATIO_FLOOR, COMMENT_HINT),
            (
                language == Language::Python && returns_without_print(code),
                MISSING_PRINT_HINT,
            ),
        ];

        let mut suggestions: Vec<String> = checks
            .iter()
            .filter(|(fired, _)| *fired)
            .map(|(_, hint)| (*hint).to_string())
            .collect();

        if suggestions.is_empty() {
            suggestions.push(HEALTHY_HINT.to_string());
        }
        suggestions.truncate(SuggestionThresholds::MAX_QUALITY_SUGGESTIONS);
        suggestions
    }
}
