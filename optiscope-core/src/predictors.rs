//! Heuristic quality and bug-probability predictors
//!
//! Both predictors are linear formulas over a handful of structural counts.
//! The coefficients live in an immutable [`Predictors`] value that is built
//! once and shared through an `Arc`; callers may inject their own set at
//! [`Analyzer`](crate::Analyzer) construction.

use crate::language::Language;
use crate::tree::{SyntaxNode, SyntaxTree};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

lazy_static! {
    static ref SHARED: Arc<Predictors> = Arc::new(Predictors::default());
    static ref TEXT_BRANCH: Regex = Regex::new(r"\b(if|elif|case)\b").unwrap();
    static ref TEXT_LOOP: Regex = Regex::new(r"\b(for|while)\b").unwrap();
    static ref TEXT_TRY: Regex = Regex::new(r"\btry\b").unwrap();
    static ref TEXT_CALL: Regex = Regex::new(r"\b[A-Za-z_]\w*\s*\(").unwrap();
    static ref TEXT_FUNCTION: Regex =
        Regex::new(r"\b(def|func|function)\b|\b[A-Za-z_]\w*\s*\([^)]*\)\s*\{").unwrap();
}

const TRY_KINDS: [&str; 3] = ["try_statement", "try_with_resources_statement", "try_block"];
const CALL_KINDS: [&str; 3] = ["call", "call_expression", "method_invocation"];

/// Counts the predictors read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorFeatures {
    pub line_count: usize,
    pub loop_count: usize,
    pub branch_count: usize,
    pub try_count: usize,
    pub call_count: usize,
    pub function_count: usize,
    pub max_loop_depth: usize,
    pub max_branch_depth: usize,
}

impl PredictorFeatures {
    /// Collect counts from a tree, or from the raw text when there is none
    pub fn collect(code: &str, language: Language, tree: Option<&SyntaxTree>) -> Self {
        let line_count = code.lines().filter(|line| !line.trim().is_empty()).count();
        let mut features = match tree {
            Some(tree) => Self::from_tree(&tree.root, language),
            None => Self::from_text(code),
        };
        features.line_count = line_count;
        features
    }

    fn from_tree(root: &SyntaxNode, language: Language) -> Self {
        let rules = language.rules();
        let mut features = Self::default();

        let mut stack = vec![(root, 0usize, 0usize)];
        while let Some((node, loop_depth, branch_depth)) = stack.pop() {
            let (mut loop_depth, mut branch_depth) = (loop_depth, branch_depth);
            if node.is_named {
                let kind = node.kind.as_str();
                if rules.is_loop(kind) {
                    features.loop_count += 1;
                    loop_depth += 1;
                    features.max_loop_depth = features.max_loop_depth.max(loop_depth);
                }
                if rules.is_conditional(kind) {
                    features.branch_count += 1;
                    branch_depth += 1;
                    features.max_branch_depth = features.max_branch_depth.max(branch_depth);
                }
                if rules.is_function(kind) {
                    features.function_count += 1;
                }
                if TRY_KINDS.contains(&kind) {
                    features.try_count += 1;
                }
                if CALL_KINDS.contains(&kind) {
                    features.call_count += 1;
                }
            }
            stack.extend(
                node.children
                    .iter()
                    .map(|child| (child, loop_depth, branch_depth)),
            );
        }

        features
    }

    fn from_text(code: &str) -> Self {
        let loops = TEXT_LOOP.find_iter(code).count();
        let branches = TEXT_BRANCH.find_iter(code).count();
        Self {
            line_count: 0,
            loop_count: loops,
            branch_count: branches,
            try_count: TEXT_TRY.find_iter(code).count(),
            call_count: TEXT_CALL.find_iter(code).count(),
            function_count: TEXT_FUNCTION.find_iter(code).count(),
            max_loop_depth: loops.min(2),
            max_branch_depth: branches.min(2),
        }
    }
}

/// Output of both predictors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// 0-100
    pub quality_score: u8,
    /// 0-1, three decimals
    pub bug_probability: f64,
}

/// Coefficients of the quality and bug-probability formulas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictors {
    pub quality: QualityCoefficients,
    pub bug: BugCoefficients,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCoefficients {
    pub base: f64,
    pub per_loop: f64,
    pub per_branch: f64,
    pub per_loop_depth: f64,
    pub per_branch_depth: f64,
    pub long_file_lines: usize,
    pub per_extra_line: f64,
    pub per_try: f64,
    pub try_bonus_cap: f64,
    pub no_function_penalty: f64,
    pub short_file_lines: usize,
    pub short_file_penalty: f64,
}

impl Default for QualityCoefficients {
    fn default() -> Self {
        Self {
            base: 90.0,
            per_loop: 2.0,
            per_branch: 1.5,
            per_loop_depth: 5.0,
            per_branch_depth: 3.0,
            long_file_lines: 120,
            per_extra_line: 0.05,
            per_try: 2.0,
            try_bonus_cap: 6.0,
            no_function_penalty: 8.0,
            short_file_lines: 8,
            short_file_penalty: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugCoefficients {
    pub base: f64,
    pub per_loop: f64,
    pub per_branch: f64,
    pub per_branch_depth: f64,
    pub per_loop_depth: f64,
    pub long_file_lines: usize,
    pub per_extra_line: f64,
    pub per_try: f64,
    pub try_relief_cap: f64,
}

impl Default for BugCoefficients {
    fn default() -> Self {
        Self {
            base: 0.12,
            per_loop: 0.03,
            per_branch: 0.025,
            per_branch_depth: 0.04,
            per_loop_depth: 0.05,
            long_file_lines: 80,
            per_extra_line: 0.0015,
            per_try: 0.02,
            try_relief_cap: 0.08,
        }
    }
}

impl Default for Predictors {
    fn default() -> Self {
        Self {
            quality: QualityCoefficients::default(),
            bug: BugCoefficients::default(),
        }
    }
}

impl Predictors {
    /// The process-wide default coefficients
    pub fn shared() -> Arc<Predictors> {
        Arc::clone(&SHARED)
    }

    pub fn predict(&self, features: &PredictorFeatures) -> Prediction {
        Prediction {
            quality_score: self.predict_quality(features),
            bug_probability: self.predict_bug_probability(features),
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn predict_quality(&self, features: &PredictorFeatures) -> u8 {
        let c = &self.quality;
        let extra_lines = features.line_count.saturating_sub(c.long_file_lines);

        let mut score = c.base
            - features.loop_count as f64 * c.per_loop
            - features.branch_count as f64 * c.per_branch
            - features.max_loop_depth as f64 * c.per_loop_depth
            - features.max_branch_depth as f64 * c.per_branch_depth
            - extra_lines as f64 * c.per_extra_line
            + (features.try_count as f64 * c.per_try).min(c.try_bonus_cap);

        if features.function_count == 0 {
            score -= c.no_function_penalty;
        }
        if features.line_count < c.short_file_lines {
            score -= c.short_file_penalty;
        }

        score.round().clamp(0.0, 100.0) as u8
    }

    pub fn predict_bug_probability(&self, features: &PredictorFeatures) -> f64 {
        let c = &self.bug;
        let extra_lines = features.line_count.saturating_sub(c.long_file_lines);

        let probability = c.base
            + features.loop_count as f64 * c.per_loop
            + features.branch_count as f64 * c.per_branch
            + features.max_branch_depth as f64 * c.per_branch_depth
            + features.max_loop_depth as f64 * c.per_loop_depth
            + extra_lines as f64 * c.per_extra_line
            - (features.try_count as f64 * c.per_try).min(c.try_relief_cap);

        (probability.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
    }
}
