//! HTTP completion client for the daemon's `/api/generate` endpoint.

use crate::{
    ChunkSink, ClientError, CompletionBackend, GenerateRequest, GenerateResponse, NdjsonDecoder,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use log::{debug, info};
use serde::Deserialize;

const GENERATE_PATH: &str = "api/generate";

/// Error body the daemon returns alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Completion backend that posts JSON to a running daemon.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionClient {
    /// Create a client for the daemon at `base_url` (e.g. `http://localhost:11434/`).
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        let endpoint = format!("{}/{GENERATE_PATH}", base_url.trim().trim_end_matches('/'));
        info!("completion client ready (endpoint={endpoint})");
        Self { http, endpoint }
    }

    /// Full URL of the generation endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, request: &GenerateRequest) -> Result<reqwest::Response, ClientError> {
        if request.model.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "model name must not be empty".to_string(),
            ));
        }
        debug!(
            "sending generate request (model={}, stream={}, prompt_len={})",
            request.model,
            request.stream,
            request.prompt.len()
        );
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(ClientError::request_failed)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|body| body.error)
            .unwrap_or(body);
        if detail.trim().is_empty() {
            Err(ClientError::RequestFailed(format!("daemon returned {status}")))
        } else {
            Err(ClientError::RequestFailed(format!(
                "daemon returned {status}: {}",
                detail.trim()
            )))
        }
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        let request = request.streaming(false);
        let response = self.send(&request).await?;
        let mut decoded: GenerateResponse =
            response.json().await.map_err(ClientError::request_failed)?;
        if let Some(error) = decoded.error.take() {
            return Err(ClientError::RequestFailed(error));
        }
        debug!(
            "generate finished (model={}, response_len={})",
            decoded.model,
            decoded.response.len()
        );
        Ok(decoded)
    }

    async fn generate_stream(
        &self,
        request: &GenerateRequest,
        sink: &mut dyn ChunkSink,
    ) -> Result<(), ClientError> {
        let request = request.streaming(true);
        let response = self.send(&request).await?;
        let mut body = response.bytes_stream();
        let mut decoder = NdjsonDecoder::new();
        let mut chunks = 0usize;

        while let Some(bytes) = body.next().await {
            let bytes = bytes.map_err(ClientError::request_failed)?;
            for chunk in decoder.push(&bytes)? {
                sink.chunk(&chunk.response);
                chunks += 1;
                if chunk.done {
                    debug!("stream finished (model={}, chunks={chunks})", request.model);
                    return Ok(());
                }
            }
        }

        if let Some(chunk) = decoder.finish()? {
            sink.chunk(&chunk.response);
            chunks += 1;
        }
        debug!(
            "stream closed by daemon (model={}, chunks={chunks})",
            request.model
        );
        Ok(())
    }
}
