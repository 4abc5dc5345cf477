//! Completion backend interface.

use crate::{ClientError, GenerateRequest, GenerateResponse};
use async_trait::async_trait;

/// Receives incremental text while a streamed response is decoded.
pub trait ChunkSink: Send {
    /// Handle one chunk of response text.
    fn chunk(&mut self, text: &str);
}

/// Anything that can turn a generation request into model output.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Issue a non-streaming request and return the whole response.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ClientError>;

    /// Issue a streaming request, feeding each chunk to `sink` until the daemon
    /// reports completion.
    async fn generate_stream(
        &self,
        request: &GenerateRequest,
        sink: &mut dyn ChunkSink,
    ) -> Result<(), ClientError>;
}
