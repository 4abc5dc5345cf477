use async_trait::async_trait;
use gollama_rs_client::{DaemonControl, DaemonError};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// In-memory daemon with a fixed model listing.
#[derive(Debug, Clone, Default)]
pub struct StubDaemon {
    models: Vec<String>,
    failing: HashSet<String>,
    pulls: Arc<Mutex<Vec<String>>>,
}

impl StubDaemon {
    pub fn new(models: &[&str]) -> Self {
        Self {
            models: models.iter().map(|model| model.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Make pulls of `model` exit unsuccessfully.
    pub fn failing_pull(mut self, model: impl Into<String>) -> Self {
        self.failing.insert(model.into());
        self
    }

    /// Every model passed to `pull_model`, in order.
    pub fn pulls(&self) -> Vec<String> {
        self.pulls.lock().clone()
    }
}

#[async_trait]
impl DaemonControl for StubDaemon {
    async fn list_models(&self) -> Result<Vec<String>, DaemonError> {
        Ok(self.models.clone())
    }

    async fn pull_model(&self, model: &str) -> Result<(), DaemonError> {
        self.pulls.lock().push(model.to_string());
        if self.failing.contains(model) {
            return Err(DaemonError::CommandFailed {
                command: format!("ollama pull {model}"),
                detail: "exit status 1".to_string(),
            });
        }
        Ok(())
    }
}
