//! Constants module for optiscope core
//!
//! Threshold values and weights used by the scorer and validator.

pub mod scoring_thresholds;

pub use scoring_thresholds::{ScoringThresholds, SuggestionThresholds};
