//! Optiscope Core - Static Analysis Engine
//!
//! This crate estimates the asymptotic complexity and quality of a single
//! source snippet:
//! - Language tables and the owned parse-tree adapter
//! - Structural feature extraction and static validation
//! - Big-O classification and multi-dimensional quality scoring
//! - Heuristic predictors and persistable record snapshots
//!
//! Every stage works in one of two strategies: `Tree` when a parse tree is
//! available, `Text` when the provider declined and regex heuristics take over.

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions, // Often necessary for clarity
    clippy::cast_precision_loss,     // Counts are far below 2^52
)]

pub mod analysis;
pub mod complexity;
pub mod constants;
pub mod extractors;
pub mod language;
pub mod models;
pub mod predictors;
pub mod python;
pub mod scoring;
pub mod tree;
pub mod validation;

// Re-export commonly used types for convenience
pub use analysis::{Analyzer, RecordOutcome};
pub use language::{detect_language, Language, NodeRules};
pub use models::{
    AnalysisError, AnalysisRecord, AnalysisReport, AnalysisResult, BigO, ErrorKind, LogicIssue,
    Metrics, ParsedFeatures, ScoreBreakdown, Severity,
};
pub use predictors::Predictors;
pub use tree::{NoTreeProvider, ParseStrategy, SyntaxNode, SyntaxTree, TreeProvider, TreeSitterProvider};
pub use validation::{ParsedProgram, Validator};

/// Result type used throughout optiscope core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for optiscope core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The submitted snippet is empty after trimming
    #[error("Code input is empty.")]
    EmptyInput,

    /// Language name outside the supported set
    #[error("Unsupported language '{0}'. Supported: python, c, cpp, java, javascript, go.")]
    UnsupportedLanguage(String),

    /// The snippet failed syntactic validation
    #[error("{message} (line {line})")]
    Syntax { message: String, line: usize },

    /// Grammar or parser setup failure
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] optiscope_utils::UtilError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
