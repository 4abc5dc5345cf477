//! Error types for config loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned while loading, saving or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// Writing a config file failed.
    #[error("failed to write config {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Parsing or serializing YAML failed.
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] serde_yaml::Error),
    /// A specific field failed validation.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// Generic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
    /// No home directory could be resolved for the default config path.
    #[error("unable to resolve the home directory for the global config")]
    HomeDirUnavailable,
}
