//! Record snapshot handed to an external persistence layer

use super::{AnalysisReport, BigO, Metrics};
use crate::language::Language;
use crate::predictors::Prediction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub language: Language,
    pub code: String,
    /// Heuristic quality prediction, 0-100
    pub quality_score: f64,
    pub complexity: BigO,
    /// Heuristic bug probability, 0-1 with three decimals
    pub bug_probability: f64,
    /// The maintainability sub-score of the analysis
    pub maintainability_index: f64,
    pub metrics: Metrics,
    pub suggestions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(
        language: Language,
        code: &str,
        report: &AnalysisReport,
        prediction: Prediction,
    ) -> Self {
        Self {
            language,
            code: code.to_string(),
            quality_score: f64::from(prediction.quality_score),
            complexity: report.complexity,
            bug_probability: prediction.bug_probability,
            maintainability_index: report.scores.maintainability,
            metrics: report.metrics,
            suggestions: report.suggestions.clone(),
            created_at: Utc::now(),
        }
    }

    /// Serialize for the persistence collaborator
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
