//! Optiscope Transform - Complexity-Driven Rewriting
//!
//! This crate turns an analyzed snippet into candidate rewrites and keeps the
//! best verified one:
//! - Ordered, individually toggled rewrite rules (three-sum, membership
//!   sets, memoization, redundant branches, blank lines)
//! - Python I/O preservation for every candidate
//! - The optimization loop, which re-analyzes candidates and only accepts a
//!   strictly cheaper complexity class

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod io_preservation;
pub mod transformers;
pub mod types;

// Re-export main types for convenience
pub use config::{OptimizerConfig, RuleToggles};
pub use engine::OptimizationEngine;
pub use io_preservation::{inject_print_fallback, preserve_io};
pub use transformers::{Rewrite, RulePipeline, Transformer};
pub use types::{
    Candidate, CandidateOrigin, OptimizationResult, OptimizationType, OptimizeOutcome, RewriteKind,
};

/// Result type for transformation operations
pub type Result<T> = std::result::Result<T, TransformError>;

/// Error types for transformation operations
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// A rule could not complete its rewrite
    #[error("Transformation error: {0}")]
    Transform(String),

    /// Pattern construction failed
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Optiscope core error
    #[error("Core error: {0}")]
    Core(#[from] optiscope_core::Error),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] optiscope_utils::UtilError),
}
