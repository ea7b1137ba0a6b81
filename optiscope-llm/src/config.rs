//! Generative service settings

use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/responses";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Overrides the configured model when set
pub const MODEL_ENV: &str = "OPENAI_OPTIMIZER_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 40,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: 0.0,
        }
    }
}

impl GenerativeConfig {
    /// API key from the configured environment variable, if non-blank
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// The model override from the environment, else the configured model
    pub fn resolved_model(&self) -> String {
        std::env::var(MODEL_ENV)
            .ok()
            .map(|model| model.trim().to_string())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| self.model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerativeConfig::default();
        assert!(config.enabled);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.timeout_secs, 40);
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: GenerativeConfig =
            serde_json::from_str(r#"{"enabled": false, "timeout_secs": 5}"#).expect("config");
        assert!(!config.enabled);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_key_variable() {
        let config = GenerativeConfig {
            api_key_env: "OPTISCOPE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..GenerativeConfig::default()
        };
        assert_eq!(config.api_key(), None);
    }
}
