//! Complexity-driven optimization loop
//!
//! Gathers candidate rewrites (generative service first, then the rule
//! pipeline), makes every Python candidate keep the original I/O contract,
//! re-analyzes each one and keeps the first candidate whose complexity class
//! ranks strictly below the original. Everything else falls back to the
//! original code.

use crate::config::OptimizerConfig;
use crate::io_preservation::preserve_io;
use crate::transformers::RulePipeline;
use crate::types::{Candidate, OptimizationResult, OptimizationType, OptimizeOutcome};
use crate::Result;
use optiscope_core::scoring::round2;
use optiscope_core::{detect_language, AnalysisReport, AnalysisResult, Analyzer, Language};
use optiscope_llm::{ResponsesClient, RewriteService};
use optiscope_utils::{format_signed, strip_code_fences};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NOT_IMPROVED_NOTE: &str =
    "Complexity could not be improved safely without changing semantics. Returned original code.";
const UNCHANGED_NOTE: &str =
    "Complexity cannot be improved safely without changing program semantics.";
const SCORE_ROSE_NOTE: &str = "Overall score increased after optimization.";

/// A verified candidate
struct Accepted {
    code: String,
    report: AnalysisReport,
    notes: Vec<String>,
}

#[derive(Debug)]
pub struct OptimizationEngine {
    analyzer: Analyzer,
    rules: RulePipeline,
    rewrite_service: Option<Arc<dyn RewriteService>>,
}

impl OptimizationEngine {
    /// Build the engine from configuration.
    ///
    /// The generative service is attached only when it is enabled and its
    /// credentials are present; otherwise only the rule pipeline runs.
    pub fn new(config: &OptimizerConfig) -> Self {
        let rewrite_service: Option<Arc<dyn RewriteService>> =
            match ResponsesClient::from_config(&config.generative) {
                Ok(client) => {
                    debug!("Generative rewrites enabled with model {}", client.model());
                    Some(Arc::new(client))
                }
                Err(error) => {
                    debug!("Generative rewrites off: {}", error);
                    None
                }
            };

        Self {
            analyzer: Analyzer::new(),
            rules: RulePipeline::from_toggles(&config.rules),
            rewrite_service,
        }
    }

    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace (or remove) the generative service
    #[must_use]
    pub fn with_rewrite_service(mut self, service: Option<Arc<dyn RewriteService>>) -> Self {
        self.rewrite_service = service;
        self
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn has_rewrite_service(&self) -> bool {
        self.rewrite_service.is_some()
    }

    /// Optimize a snippet.
    ///
    /// # Errors
    ///
    /// Only failures of the original analysis (such as empty input) escape;
    /// a snippet with syntax or logic errors comes back as
    /// [`OptimizeOutcome::Rejected`].
    pub fn optimize(&self, code: &str, language: Option<&str>) -> Result<OptimizeOutcome> {
        let original = match self.analyzer.analyze(code, language)? {
            AnalysisResult::Success(report) => report,
            AnalysisResult::Error(error) => return Ok(OptimizeOutcome::Rejected(error)),
        };
        let language = detect_language(code, language);

        let mut best: Option<Accepted> = None;
        let mut best_rank = original.complexity.rank();

        for candidate in self.candidates(code, language) {
            let Some(accepted) = self.verify(code, language, candidate) else {
                continue;
            };
            let rank = accepted.report.complexity.rank();
            if rank < best_rank {
                best_rank = rank;
                best = Some(accepted);
            }
        }

        let improved = best.is_some();
        let (optimized_code, optimized, raw_notes) = match best {
            Some(accepted) => (accepted.code, accepted.report, accepted.notes),
            None => (
                code.to_string(),
                original.clone(),
                vec![NOT_IMPROVED_NOTE.to_string()],
            ),
        };

        let notes = merge_notes(&original, &optimized, &raw_notes, improved);
        let score_delta = round2(optimized.scores.overall - original.scores.overall);
        info!(
            "Optimized {} snippet: {} -> {} (score {})",
            language,
            original.complexity,
            optimized.complexity,
            format_signed(score_delta)
        );

        Ok(OptimizeOutcome::Optimized(OptimizationResult {
            original_complexity: original.complexity,
            optimized_code,
            optimized_complexity: optimized.complexity,
            complexity_improved: improved,
            optimization_type: if improved {
                OptimizationType::AlgorithmicImprovement
            } else {
                OptimizationType::NoComplexityImprovement
            },
            original_score: round2(original.scores.overall),
            optimized_score: round2(optimized.scores.overall),
            score_improvement: format_signed(score_delta),
            notes,
        }))
    }

    /// Candidate pool in preference order
    fn candidates(&self, code: &str, language: Language) -> Vec<Candidate> {
        let mut pool = Vec::with_capacity(2);

        if let Some(service) = &self.rewrite_service {
            match service.rewrite(code, language) {
                Ok(text) => pool.push(Candidate::generative(text)),
                Err(error) => warn!("{} produced no candidate: {}", service.name(), error),
            }
        }

        match self.rules.run(code, language) {
            Ok(candidate) => pool.push(candidate),
            Err(error) => warn!("Rule pipeline failed: {}", error),
        }

        pool
    }

    /// Normalize, preserve I/O and re-analyze one candidate
    fn verify(&self, original: &str, language: Language, candidate: Candidate) -> Option<Accepted> {
        let origin = candidate.origin;
        let mut code = strip_code_fences(&candidate.code);
        let mut notes = candidate.notes;

        if language == Language::Python {
            let (preserved, io_notes) = preserve_io(original, &code);
            code = preserved;
            notes.extend(io_notes);
        }

        if code.trim() == original.trim() {
            debug!("{} candidate is identical to the original", origin);
            return None;
        }

        match self.analyzer.analyze(&code, Some(language.as_str())) {
            Ok(AnalysisResult::Success(report)) => {
                debug!("{} candidate classified as {}", origin, report.complexity);
                Some(Accepted {
                    code,
                    report,
                    notes,
                })
            }
            Ok(AnalysisResult::Error(error)) => {
                debug!("{} candidate rejected: {}", origin, error.message);
                None
            }
            Err(error) => {
                debug!("{} candidate failed analysis: {}", origin, error);
                None
            }
        }
    }
}

fn merge_notes(
    original: &AnalysisReport,
    optimized: &AnalysisReport,
    raw_notes: &[String],
    improved: bool,
) -> String {
    let mut notes: Vec<String> = Vec::new();
    for note in raw_notes {
        if !note.is_empty() && !notes.contains(note) {
            notes.push(note.clone());
        }
    }

    if improved {
        notes.push(format!(
            "Complexity reduced from {} to {}.",
            original.complexity, optimized.complexity
        ));
    } else if original.complexity == optimized.complexity && raw_notes.is_empty() {
        notes.push(UNCHANGED_NOTE.to_string());
    }

    if optimized.scores.overall > original.scores.overall {
        notes.push(SCORE_ROSE_NOTE.to_string());
    }

    notes.join(" ").trim().to_string()
}
