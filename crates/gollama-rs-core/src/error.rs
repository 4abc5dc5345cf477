//! Error types for the core crate.

use gollama_rs_client::DaemonError;
use gollama_rs_config::ConfigError;
use thiserror::Error;

/// Errors returned by sessions, setup and update flows.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The terminal input reached end-of-file while a value was required.
    #[error("input closed before a value was entered")]
    InputClosed,
    /// The daemon reports no installed models.
    #[error("no models installed; pull one with `ollama pull <model_name>` and try again")]
    NoModelsInstalled,
    /// A model name is not in the daemon listing.
    #[error("model '{0}' is not available")]
    UnknownModel(String),
    /// A temperature outside the accepted range.
    #[error("temperature {0} must be between 0.1 and 1.0")]
    InvalidTemperature(f64),
    /// A configured model slot is empty.
    #[error("no {0} model configured; run `gollama config` first")]
    MissingModel(&'static str),
    /// Setup was not confirmed within the allowed number of rounds.
    #[error("setup not confirmed after {0} attempts")]
    SetupAborted(usize),
    /// Config store error.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Daemon command error.
    #[error("daemon error: {0}")]
    Daemon(#[from] DaemonError),
    /// Terminal I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
