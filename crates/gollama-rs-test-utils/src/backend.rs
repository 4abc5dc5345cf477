use async_trait::async_trait;
use gollama_rs_client::{
    ChunkSink, ClientError, CompletionBackend, GenerateRequest, GenerateResponse,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Reply {
    Chunks(Vec<String>),
    Fail(String),
}

/// Completion backend answering from a per-model script.
///
/// Every request is recorded; clones share the same record. Models without a
/// scripted reply fail the way the daemon does for unknown models.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    replies: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `model` with `text` as a single chunk.
    pub fn reply(mut self, model: impl Into<String>, text: impl Into<String>) -> Self {
        self.replies
            .insert(model.into(), Reply::Chunks(vec![text.into()]));
        self
    }

    /// Answer `model` with several streamed chunks.
    pub fn stream(mut self, model: impl Into<String>, chunks: &[&str]) -> Self {
        let chunks = chunks.iter().map(|chunk| chunk.to_string()).collect();
        self.replies.insert(model.into(), Reply::Chunks(chunks));
        self
    }

    /// Fail every request to `model`.
    pub fn fail(mut self, model: impl Into<String>, message: impl Into<String>) -> Self {
        self.replies
            .insert(model.into(), Reply::Fail(message.into()));
        self
    }

    /// Shared record of every request seen.
    pub fn calls(&self) -> Arc<Mutex<Vec<GenerateRequest>>> {
        self.calls.clone()
    }

    /// Models requested so far, in order.
    pub fn models_called(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .map(|request| request.model.clone())
            .collect()
    }

    fn answer(&self, request: &GenerateRequest) -> Result<Vec<String>, ClientError> {
        self.calls.lock().push(request.clone());
        match self.replies.get(&request.model) {
            Some(Reply::Chunks(chunks)) => Ok(chunks.clone()),
            Some(Reply::Fail(message)) => Err(ClientError::RequestFailed(message.clone())),
            None => Err(ClientError::RequestFailed(format!(
                "model '{}' not found",
                request.model
            ))),
        }
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        let chunks = self.answer(request)?;
        Ok(GenerateResponse {
            model: request.model.clone(),
            response: chunks.concat(),
            done: true,
            ..GenerateResponse::default()
        })
    }

    async fn generate_stream(
        &self,
        request: &GenerateRequest,
        sink: &mut dyn ChunkSink,
    ) -> Result<(), ClientError> {
        for chunk in self.answer(request)? {
            sink.chunk(&chunk);
        }
        Ok(())
    }
}

/// Backend whose every request fails with the same message.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn generate(&self, _request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        Err(ClientError::RequestFailed(self.message.clone()))
    }

    async fn generate_stream(
        &self,
        _request: &GenerateRequest,
        _sink: &mut dyn ChunkSink,
    ) -> Result<(), ClientError> {
        Err(ClientError::RequestFailed(self.message.clone()))
    }
}
