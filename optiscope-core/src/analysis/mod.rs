//! Optiscope analysis entry point
//!
//! The [`Analyzer`] ties validation, extraction, classification, scoring and
//! the heuristic predictors into one call per snippet.

pub mod analyzer;

pub use analyzer::{Analyzer, RecordOutcome};
