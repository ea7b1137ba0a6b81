//! Analysis Result Model
//!
//! Shapes of the analysis payload. A snippet either analyzes cleanly into an
//! [`AnalysisReport`] or is rejected with an [`AnalysisError`]; both are plain
//! values, serialized with a `status` tag of `"success"` or `"error"`.

use super::{BigO, Metrics};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// Finding from a logic check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicIssue {
    pub message: String,
    /// 1-based
    pub line: usize,
    pub severity: Severity,
}

impl LogicIssue {
    pub fn warning(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line: line.max(1),
            severity: Severity::Warning,
        }
    }

    pub fn error(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line: line.max(1),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Suggestion text used when the issue is only a warning
    pub fn as_suggestion(&self) -> String {
        format!("Line {}: {}", self.line, self.message)
    }
}

/// Why a snippet was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Syntax,
    Logic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisError {
    pub error_type: ErrorKind,
    pub message: String,
    pub line: usize,
}

impl AnalysisError {
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self {
            error_type: ErrorKind::Syntax,
            message: message.into(),
            line: line.max(1),
        }
    }
}

impl From<&LogicIssue> for AnalysisError {
    fn from(issue: &LogicIssue) -> Self {
        Self {
            error_type: ErrorKind::Logic,
            message: issue.message.clone(),
            line: issue.line,
        }
    }
}

/// Quality sub-scores, each in `[0, 100]` with two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub readability: f64,
    pub maintainability: f64,
    pub efficiency: f64,
    pub safety: f64,
    /// Mean of the four sub-scores
    pub overall: f64,
}

/// Successful analysis payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub complexity: BigO,
    pub metrics: Metrics,
    pub scores: ScoreBreakdown,
    pub suggestions: Vec<String>,
    pub extra_issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisResult {
    Success(AnalysisReport),
    Error(AnalysisError),
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success(_))
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisResult::Success(report) => Some(report),
            AnalysisResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            AnalysisResult::Success(_) => None,
            AnalysisResult::Error(error) => Some(error),
        }
    }
}
