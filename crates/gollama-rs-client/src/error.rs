//! Error types for the daemon clients.

use thiserror::Error;

/// Errors returned by completion backends.
///
/// Transport failures, non-success statuses and undecodable bodies all collapse
/// into `RequestFailed`; the message is for display only.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request was rejected before any network I/O.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The request could not be completed.
    #[error("request failed: {0}")]
    RequestFailed(String),
}

impl ClientError {
    pub(crate) fn request_failed(err: impl std::fmt::Display) -> Self {
        ClientError::RequestFailed(err.to_string())
    }
}

/// Errors returned while driving the daemon's command-line interface.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// The daemon binary is not on PATH.
    #[error("{0} is not installed or not on PATH")]
    NotInstalled(String),
    /// The daemon did not respond after a start attempt.
    #[error("{0} is not running; start it manually and try again")]
    NotRunning(String),
    /// A daemon command exited unsuccessfully.
    #[error("`{command}` failed: {detail}")]
    CommandFailed { command: String, detail: String },
    /// Spawning or waiting on the daemon command failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
