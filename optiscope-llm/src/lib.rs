//! Optiscope LLM - Generative Rewrite Service
//!
//! The optimizer treats a language model as one more candidate source. This
//! crate provides:
//! - The [`RewriteService`] seam the optimization loop calls through
//! - [`ResponsesClient`], a blocking client for the OpenAI `responses` API
//! - The optimization directive and response-text extraction
//!
//! Every failure is reported as an [`LlmError`]; callers downgrade it to
//! "no candidate".

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod openai;
pub mod prompt;

pub use config::GenerativeConfig;
pub use openai::{extract_output_text, ResponsesClient};
pub use prompt::{user_prompt, SYSTEM_PROMPT};

use optiscope_core::Language;

/// Result type for LLM operations
pub type LlmResult<T> = std::result::Result<T, LlmError>;

/// Error types for LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Disabled by configuration or missing credentials
    #[error("Generative service unavailable: {0}")]
    Unavailable(String),

    /// Transport failure or non-success status
    #[error("HTTP error: {0}")]
    Http(String),

    /// The request exceeded its deadline
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The payload carried no usable text
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            LlmError::Timeout(error.to_string())
        } else {
            LlmError::Http(error.to_string())
        }
    }
}

/// A source of whole-program rewrites
pub trait RewriteService: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Propose a rewrite of `code`.
    ///
    /// # Errors
    ///
    /// Any failure to produce a rewrite.
    fn rewrite(&self, code: &str, language: Language) -> LlmResult<String>;
}
