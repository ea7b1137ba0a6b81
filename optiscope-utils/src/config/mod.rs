//! Layered configuration loading
//!
//! Configuration is resolved as defaults, then a file (TOML, JSON or YAML,
//! chosen by extension), then explicit overrides. Merging happens on the
//! `serde_json::Value` form so partial files only touch the keys they name.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick a format from the file extension
    ///
    /// # Errors
    ///
    /// Returns `UtilError::Config` for unknown extensions.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            other => Err(crate::UtilError::Config(format!(
                "Unsupported config format: {other}"
            ))),
        }
    }
}

/// Parse a file into an untyped JSON value
fn load_value(path: &Path) -> crate::Result<serde_json::Value> {
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;

    let value = match format {
        ConfigFormat::Toml => {
            let toml_value: toml::Value = toml::from_str(&content)
                .map_err(|e| crate::UtilError::Config(format!("TOML parse error: {e}")))?;
            serde_json::to_value(toml_value)
                .map_err(|e| crate::UtilError::Config(format!("TOML conversion error: {e}")))?
        }
        ConfigFormat::Json => serde_json::from_str(&content)
            .map_err(|e| crate::UtilError::Config(format!("JSON parse error: {e}")))?,
        ConfigFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| crate::UtilError::Config(format!("YAML parse error: {e}")))?,
    };

    Ok(value)
}

/// Merge two JSON values (second overrides first, objects merge key by key)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}

/// Load a typed configuration from a file
///
/// # Errors
///
/// Fails on I/O errors, unknown extensions and parse/deserialization errors.
pub fn load_config<T>(path: &Path) -> crate::Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let value = load_value(path)?;
    serde_json::from_value(value)
        .map_err(|e| crate::UtilError::Config(format!("{}: {e}", path.display())))
}

/// Merge two configurations (second overrides first)
///
/// # Errors
///
/// Fails when either side cannot round-trip through `serde_json`.
pub fn merge_configs<T>(base: &mut T, override_config: T) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base_value = serde_json::to_value(&*base)
        .map_err(|e| crate::UtilError::Serialization(format!("Base serialization error: {e}")))?;
    let override_value = serde_json::to_value(override_config).map_err(|e| {
        crate::UtilError::Serialization(format!("Override serialization error: {e}"))
    })?;

    merge_json_values(&mut base_value, override_value);

    *base = serde_json::from_value(base_value).map_err(|e| {
        crate::UtilError::Serialization(format!("Result deserialization error: {e}"))
    })?;

    Ok(())
}

/// Configuration builder: defaults, then files, then overrides
#[derive(Debug)]
pub struct ConfigBuilder<T> {
    value: serde_json::Value,
    _marker: std::marker::PhantomData<T>,
}

impl<T> ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    /// Start from `T::default()`
    ///
    /// # Errors
    ///
    /// Fails when the default value cannot be serialized.
    pub fn new() -> crate::Result<Self> {
        let value = serde_json::to_value(T::default())
            .map_err(|e| crate::UtilError::Serialization(format!("Default serialization error: {e}")))?;
        Ok(Self {
            value,
            _marker: std::marker::PhantomData,
        })
    }

    /// Merge a file on top; only the keys present in the file change.
    ///
    /// # Errors
    ///
    /// See [`load_config`].
    pub fn load_file(mut self, path: &Path) -> crate::Result<Self> {
        let file_value = load_value(path)?;
        merge_json_values(&mut self.value, file_value);
        Ok(self)
    }

    /// Merge an untyped override (e.g. built from command-line flags)
    #[must_use]
    pub fn set(mut self, override_value: serde_json::Value) -> Self {
        merge_json_values(&mut self.value, override_value);
        self
    }

    /// Deserialize the final configuration
    ///
    /// # Errors
    ///
    /// Fails when the merged value no longer matches `T`.
    pub fn build(self) -> crate::Result<T> {
        serde_json::from_value(self.value)
            .map_err(|e| crate::UtilError::Config(format!("Invalid configuration: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct TestConfig {
        name: String,
        port: u16,
        enabled: bool,
        nested: Nested,
    }

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct Nested {
        timeout_secs: u64,
        model: String,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                name: "default".to_string(),
                port: 8080,
                enabled: true,
                nested: Nested {
                    timeout_secs: 40,
                    model: "base".to_string(),
                },
            }
        }
    }

    #[test]
    fn test_load_toml() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("test.toml");
        std::fs::write(
            &config_path,
            "name = \"test\"\nport = 9000\nenabled = false\n[nested]\ntimeout_secs = 5\n",
        )?;

        let config: TestConfig = load_config(&config_path)?;
        assert_eq!(config.name, "test");
        assert_eq!(config.port, 9000);
        assert!(!config.enabled);
        assert_eq!(config.nested.timeout_secs, 5);
        assert_eq!(config.nested.model, "");
        Ok(())
    }

    #[test]
    fn test_unknown_extension_rejected() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("test.ini");
        std::fs::write(&config_path, "name=x")?;

        let result: crate::Result<TestConfig> = load_config(&config_path);
        assert!(matches!(result, Err(crate::UtilError::Config(_))));
        Ok(())
    }

    #[test]
    fn test_merge_configs() -> crate::Result<()> {
        let mut base = TestConfig::default();
        let override_config = TestConfig {
            name: "override".to_string(),
            port: 9000,
            enabled: false,
            nested: Nested::default(),
        };

        merge_configs(&mut base, override_config)?;
        assert_eq!(base.name, "override");
        assert_eq!(base.port, 9000);
        assert_eq!(base.nested.timeout_secs, 0);
        Ok(())
    }

    #[test]
    fn test_builder_keeps_defaults_for_missing_keys() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("builder.yaml");
        std::fs::write(&config_path, "port: 7777\nnested:\n  model: custom\n")?;

        let config: TestConfig = ConfigBuilder::new()?
            .load_file(&config_path)?
            .set(serde_json::json!({ "enabled": false }))
            .build()?;

        assert_eq!(config.name, "default");
        assert_eq!(config.port, 7777);
        assert!(!config.enabled);
        assert_eq!(config.nested.timeout_secs, 40);
        assert_eq!(config.nested.model, "custom");
        Ok(())
    }

    #[test]
    fn test_json_file() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("c.json");
        std::fs::write(&config_path, r#"{"name": "json"}"#)?;

        let config: TestConfig = ConfigBuilder::new()?.load_file(&config_path)?.build()?;
        assert_eq!(config.name, "json");
        assert_eq!(config.port, 8080);
        Ok(())
    }
}
