//! Data models module for optiscope core
//!
//! Immutable values constructed per request: extracted features, Big-O
//! labels, analysis payloads and record snapshots.

pub mod analysis_result;
pub mod big_o;
pub mod features;
pub mod record;

pub use analysis_result::{
    AnalysisError, AnalysisReport, AnalysisResult, ErrorKind, LogicIssue, ScoreBreakdown, Severity,
};
pub use big_o::BigO;
pub use features::{Metrics, ParsedFeatures};
pub use record::AnalysisRecord;
