//! Control of the daemon through its own command-line interface.

use crate::DaemonError;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const DEFAULT_BINARY: &str = "ollama";
/// Grace period between spawning the daemon and re-checking it.
const STARTUP_GRACE: Duration = Duration::from_secs(2);
/// First field of the column header printed by `ollama list`.
const LISTING_HEADER: &str = "NAME";

/// Model registry and update operations backed by the daemon.
#[async_trait]
pub trait DaemonControl: Send + Sync {
    /// Names of the models currently installed.
    async fn list_models(&self) -> Result<Vec<String>, DaemonError>;
    /// Pull (install or update) one model.
    async fn pull_model(&self, model: &str) -> Result<(), DaemonError>;
}

/// Outcome of `OllamaDaemon::ensure_running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    /// The daemon answered the first liveness check.
    AlreadyRunning,
    /// The daemon was spawned and answered after the grace period.
    Started,
}

/// Wrapper around the `ollama` executable.
#[derive(Debug, Clone)]
pub struct OllamaDaemon {
    binary: String,
    startup_grace: Duration,
}

impl Default for OllamaDaemon {
    fn default() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            startup_grace: STARTUP_GRACE,
        }
    }
}

impl OllamaDaemon {
    /// Daemon driven through the `ollama` binary on PATH.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable name or path.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Override the wait between spawning the daemon and re-checking it.
    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace = grace;
        self
    }

    /// Whether the executable can be resolved.
    pub fn is_installed(&self) -> bool {
        let found = which::which(&self.binary).is_ok();
        debug!("daemon binary lookup (binary={}, found={found})", self.binary);
        found
    }

    /// Whether the daemon answers `ollama ps`.
    pub async fn is_running(&self) -> bool {
        let status = Command::new(&self.binary)
            .arg("ps")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        match status {
            Ok(status) => status.success(),
            Err(err) => {
                debug!("liveness check failed to spawn: {err}");
                false
            }
        }
    }

    /// Start the daemon once if it is not answering, then re-check.
    ///
    /// The spawned `serve` process is detached; nothing supervises it after
    /// the re-check succeeds.
    pub async fn ensure_running(&self) -> Result<DaemonStatus, DaemonError> {
        if !self.is_installed() {
            return Err(DaemonError::NotInstalled(self.binary.clone()));
        }
        if self.is_running().await {
            return Ok(DaemonStatus::AlreadyRunning);
        }

        info!("daemon not answering, spawning `{} serve`", self.binary);
        Command::new(&self.binary)
            .arg("serve")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        tokio::time::sleep(self.startup_grace).await;

        if self.is_running().await {
            info!("daemon started");
            Ok(DaemonStatus::Started)
        } else {
            warn!("daemon still not answering after start attempt");
            Err(DaemonError::NotRunning(self.binary.clone()))
        }
    }
}

#[async_trait]
impl DaemonControl for OllamaDaemon {
    async fn list_models(&self) -> Result<Vec<String>, DaemonError> {
        let output = Command::new(&self.binary)
            .arg("list")
            .stdin(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Err(DaemonError::CommandFailed {
                command: format!("{} list", self.binary),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let models = parse_model_listing(&String::from_utf8_lossy(&output.stdout));
        debug!("listed models (count={})", models.len());
        Ok(models)
    }

    async fn pull_model(&self, model: &str) -> Result<(), DaemonError> {
        info!("pulling model (model={model})");
        let status = Command::new(&self.binary)
            .arg("pull")
            .arg(model)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        if status.success() {
            Ok(())
        } else {
            Err(DaemonError::CommandFailed {
                command: format!("{} pull {model}", self.binary),
                detail: match status.code() {
                    Some(code) => format!("exit status {code}"),
                    None => "terminated by signal".to_string(),
                },
            })
        }
    }
}

/// Extract model names from `ollama list` output.
///
/// The first whitespace-separated field of each line is the name; blank lines
/// and the `NAME ...` header are skipped.
pub fn parse_model_listing(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|name| *name != LISTING_HEADER)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn listing_skips_header_and_blank_lines() {
        let output = "NAME            ID              SIZE      MODIFIED\n\
                      llama3.2:3b     a80c4f17acd5    2.0 GB    2 days ago\n\
                      \n\
                      mistral:7b      f974a74358d6    4.1 GB    3 weeks ago\n";
        assert_eq!(
            parse_model_listing(output),
            vec!["llama3.2:3b".to_string(), "mistral:7b".to_string()]
        );
    }

    #[test]
    fn empty_listing_has_no_models() {
        assert!(parse_model_listing("NAME ID SIZE MODIFIED\n").is_empty());
        assert!(parse_model_listing("").is_empty());
    }

    #[tokio::test]
    async fn missing_binary_is_not_installed() {
        let daemon = OllamaDaemon::new().with_binary("gollama-test-no-such-binary");
        assert!(!daemon.is_installed());
        assert!(!daemon.is_running().await);
        let err = daemon.ensure_running().await.unwrap_err();
        assert!(matches!(err, DaemonError::NotInstalled(_)));
    }
}
