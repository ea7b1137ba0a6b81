//! OpenAI `responses` API integration
//!
//! A blocking client: the optimizer is synchronous and this is its only
//! network call.

use crate::config::GenerativeConfig;
use crate::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::{LlmError, LlmResult, RewriteService};
use optiscope_core::Language;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Request structure for the `responses` API
#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    temperature: f32,
    input: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<InputText>,
}

#[derive(Debug, Serialize)]
struct InputText {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl Message {
    fn new(role: &'static str, text: String) -> Self {
        Self {
            role,
            content: vec![InputText {
                kind: "input_text",
                text,
            }],
        }
    }
}

/// Text of a `responses` payload: `output_text` when non-blank, else every
/// `output[].content[].text` joined by newlines. `None` when both are empty.
pub fn extract_output_text(payload: &Value) -> Option<String> {
    if let Some(text) = payload.get("output_text").and_then(Value::as_str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    let chunks: Vec<&str> = payload
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter_map(|content| content.get("text").and_then(Value::as_str))
        .collect();

    let joined = chunks.join("\n");
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Client for the configured `responses` endpoint
#[derive(Debug)]
pub struct ResponsesClient {
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
    client: Client,
}

impl ResponsesClient {
    /// Build a client from configuration and the environment.
    ///
    /// # Errors
    ///
    /// `LlmError::Unavailable` when the service is disabled or the API key
    /// variable is unset; `LlmError::Http` when the HTTP client cannot be built.
    pub fn from_config(config: &GenerativeConfig) -> LlmResult<Self> {
        if !config.enabled {
            return Err(LlmError::Unavailable("disabled by configuration".to_string()));
        }
        let api_key = config.api_key().ok_or_else(|| {
            LlmError::Unavailable(format!("{} is not set", config.api_key_env))
        })?;
        Self::with_api_key(config, api_key)
    }

    /// Build a client with an explicit key, ignoring the environment.
    ///
    /// # Errors
    ///
    /// `LlmError::Http` when the HTTP client cannot be built.
    pub fn with_api_key(config: &GenerativeConfig, api_key: impl Into<String>) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            model: config.resolved_model(),
            temperature: config.temperature,
            api_key: api_key.into(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for an optimized rewrite of `code`.
    ///
    /// # Errors
    ///
    /// `Http`/`Timeout` on transport failure or non-success status,
    /// `MalformedResponse` when the payload is not JSON or carries no text.
    pub fn generate(&self, code: &str, language: Language) -> LlmResult<String> {
        let request_body = ResponsesRequest {
            model: &self.model,
            temperature: self.temperature,
            input: vec![
                Message::new("system", SYSTEM_PROMPT.to_string()),
                Message::new("user", user_prompt(language, code)),
            ],
        };

        debug!("Requesting rewrite from {} ({})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Http(format!("API error ({status}): {error_text}")));
        }

        let payload: Value = response
            .json()
            .map_err(|e| LlmError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        extract_output_text(&payload)
            .ok_or_else(|| LlmError::MalformedResponse("response carried no text".to_string()))
    }
}

impl RewriteService for ResponsesClient {
    fn name(&self) -> &str {
        "openai-responses"
    }

    fn rewrite(&self, code: &str, language: Language) -> LlmResult<String> {
        self.generate(code, language)
    }
}
