//! Single-snippet analysis pipeline
//!
//! validate → logic checks → features → complexity → scores → suggestions
//! → extra issues. Syntax and logic rejections are returned as values; only
//! empty input and internal failures surface as `Err`.

use crate::complexity::ComplexityClassifier;
use crate::constants::SuggestionThresholds;
use crate::extractors::FeatureExtractor;
use crate::language::detect_language;
use crate::models::{
    AnalysisError, AnalysisRecord, AnalysisReport, AnalysisResult, Metrics,
};
use crate::predictors::{PredictorFeatures, Predictors};
use crate::scoring::{extra_issues, QualityScorer};
use crate::tree::{TreeProvider, TreeSitterProvider};
use crate::validation::{ParsedProgram, Validator};
use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of [`Analyzer::record`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Recorded(AnalysisRecord),
    Rejected(AnalysisError),
}

/// Rejections serialize exactly like an analysis error payload
impl Serialize for RecordOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            RecordOutcome::Recorded(record) => record.serialize(serializer),
            RecordOutcome::Rejected(error) => {
                AnalysisResult::Error(error.clone()).serialize(serializer)
            }
        }
    }
}

/// Accepted program plus its report, or the rejection
enum Verdict {
    Accepted {
        program: ParsedProgram,
        report: AnalysisReport,
    },
    Rejected(AnalysisError),
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    validator: Validator,
    extractor: FeatureExtractor,
    classifier: ComplexityClassifier,
    scorer: QualityScorer,
    predictors: Arc<Predictors>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer backed by the bundled tree-sitter grammars
    pub fn new() -> Self {
        Self::with_provider(Arc::new(TreeSitterProvider::new()))
    }

    pub fn with_provider(provider: Arc<dyn TreeProvider>) -> Self {
        Self {
            validator: Validator::new(provider),
            extractor: FeatureExtractor::new(),
            classifier: ComplexityClassifier::new(),
            scorer: QualityScorer::new(),
            predictors: Predictors::shared(),
        }
    }

    /// Replace the shared predictor coefficients
    pub fn with_predictors(mut self, predictors: Arc<Predictors>) -> Self {
        self.predictors = predictors;
        self
    }

    pub fn provider(&self) -> &Arc<dyn TreeProvider> {
        self.validator.provider()
    }

    /// Analyze a snippet.
    ///
    /// `language` is a declared name; unknown or missing names fall back to
    /// detection from the text.
    ///
    /// # Errors
    ///
    /// `Error::EmptyInput` for blank code; other errors indicate an internal
    /// failure rather than a problem with the snippet.
    pub fn analyze(&self, code: &str, language: Option<&str>) -> Result<AnalysisResult> {
        Ok(match self.run(code, language)? {
            Verdict::Accepted { report, .. } => AnalysisResult::Success(report),
            Verdict::Rejected(error) => AnalysisResult::Error(error),
        })
    }

    /// Analyze and build a persistable record with the heuristic predictions.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`].
    pub fn record(&self, code: &str, language: Option<&str>) -> Result<RecordOutcome> {
        match self.run(code, language)? {
            Verdict::Accepted { program, report } => {
                let features =
                    PredictorFeatures::collect(&program.code, program.language, program.tree.as_ref());
                let prediction = self.predictors.predict(&features);
                debug!("Predictions: {:?}", prediction);
                Ok(RecordOutcome::Recorded(AnalysisRecord::new(
                    program.language,
                    &program.code,
                    &report,
                    prediction,
                )))
            }
            Verdict::Rejected(error) => Ok(RecordOutcome::Rejected(error)),
        }
    }

    fn run(&self, code: &str, language: Option<&str>) -> Result<Verdict> {
        let language = detect_language(code, language);

        let program = match self.validator.parse(code, language) {
            Ok(program) => program,
            Err(Error::Syntax { message, line }) => {
                debug!("Rejected {} snippet: {} (line {})", language, message, line);
                return Ok(Verdict::Rejected(AnalysisError::syntax(message, line)));
            }
            Err(error) => return Err(error),
        };
        debug!("Analyzing {} snippet with {} strategy", language, program.strategy());

        let issues = self.validator.run_logic_checks(&program);
        if let Some(fatal) = issues.iter().find(|issue| issue.is_error()) {
            debug!("Logic error at line {}: {}", fatal.line, fatal.message);
            return Ok(Verdict::Rejected(AnalysisError::from(fatal)));
        }

        let features = match self.extractor.extract(code, language, program.tree.as_ref()) {
            Ok(features) => features,
            Err(Error::Syntax { message, line }) => {
                return Ok(Verdict::Rejected(AnalysisError::syntax(message, line)));
            }
            Err(error) => return Err(error),
        };

        let complexity = self.classifier.compute(&program);
        let scores = self.scorer.score(code, &features, complexity);

        let mut suggestions: Vec<String> = issues.iter().map(|issue| issue.as_suggestion()).collect();
        suggestions.extend(
            self.scorer
                .suggestions(code, language, &scores, complexity, &features),
        );
        suggestions.truncate(SuggestionThresholds::MAX_SUGGESTIONS);

        info!(
            "Analyzed {} snippet: {} overall {:.2}",
            language, complexity, scores.overall
        );

        let report = AnalysisReport {
            complexity,
            metrics: Metrics::from(&features),
            scores,
            suggestions,
            extra_issues: extra_issues(code, language),
        };

        Ok(Verdict::Accepted { program, report })
    }
}
