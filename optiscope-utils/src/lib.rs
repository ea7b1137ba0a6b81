//! Optiscope Utilities
//!
//! Shared plumbing for the optiscope workspace: subscriber setup for
//! `tracing`, layered configuration loading (TOML, JSON, YAML) and the
//! small text helpers the analysis and rewrite crates lean on.

#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod logging;
pub mod string;

pub use config::{load_config, merge_configs, ConfigBuilder};
pub use logging::{init_logging, LogLevel, LoggerConfig};
pub use string::{
    collapse_whitespace, dedent_block, format_signed, line_of_offset, safe_truncate,
    squeeze_lowercase, strip_code_fences,
};

/// Result type used throughout the optiscope utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}
