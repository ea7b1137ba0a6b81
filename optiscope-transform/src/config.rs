//! Optimizer configuration
//!
//! Layered through [`ConfigBuilder`]: built-in defaults, then an optional
//! file, then command-line overrides.

use crate::types::RewriteKind;
use crate::Result;
use optiscope_llm::GenerativeConfig;
use optiscope_utils::ConfigBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One switch per rewrite rule; every rule is on by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleToggles {
    pub three_sum: bool,
    pub membership: bool,
    pub repeated_membership: bool,
    pub memoize: bool,
    pub redundant_conditions: bool,
    pub blank_lines: bool,
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            three_sum: true,
            membership: true,
            repeated_membership: true,
            memoize: true,
            redundant_conditions: true,
            blank_lines: true,
        }
    }
}

impl RuleToggles {
    pub fn is_enabled(&self, kind: RewriteKind) -> bool {
        match kind {
            RewriteKind::ThreeSum => self.three_sum,
            RewriteKind::MembershipSet => self.membership,
            RewriteKind::RepeatedMembership => self.repeated_membership,
            RewriteKind::Memoization => self.memoize,
            RewriteKind::RedundantConditional => self.redundant_conditions,
            RewriteKind::BlankLines => self.blank_lines,
        }
    }

    /// Enabled kinds in pipeline order
    pub fn enabled(&self) -> Vec<RewriteKind> {
        RewriteKind::all()
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub rules: RuleToggles,
    pub generative: GenerativeConfig,
}

impl OptimizerConfig {
    /// Defaults, then `path` when given, then `overrides`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, or when the merged
    /// value no longer describes an `OptimizerConfig`.
    pub fn load(path: Option<&Path>, overrides: Option<serde_json::Value>) -> Result<Self> {
        let mut builder = ConfigBuilder::<Self>::new()?;
        if let Some(path) = path {
            builder = builder.load_file(path)?;
        }
        if let Some(overrides) = overrides {
            builder = builder.set(overrides);
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_enable_everything() {
        let config = OptimizerConfig::default();
        assert_eq!(config.rules.enabled(), RewriteKind::all());
        assert!(config.generative.enabled);
    }

    #[test]
    fn test_toml_file_overrides_only_named_keys() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("optiscope.toml");
        fs::write(
            &path,
            "[rules]\nmemoize = false\n\n[generative]\ntimeout_secs = 5\n",
        )
        .expect("write");

        let config = OptimizerConfig::load(Some(&path), None).expect("config");
        assert!(!config.rules.memoize);
        assert!(config.rules.three_sum);
        assert_eq!(config.generative.timeout_secs, 5);
        assert_eq!(config.generative.model, "gpt-4.1-mini");
        assert!(!config.rules.enabled().contains(&RewriteKind::Memoization));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("optiscope.json");
        fs::write(&path, r#"{"generative": {"enabled": true}}"#).expect("write");

        let overrides = serde_json::json!({"generative": {"enabled": false}});
        let config = OptimizerConfig::load(Some(&path), Some(overrides)).expect("config");
        assert!(!config.generative.enabled);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let result = OptimizerConfig::load(Some(&dir.path().join("absent.toml")), None);
        assert!(result.is_err());
    }
}
