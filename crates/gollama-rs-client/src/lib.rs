//! Clients for the local Ollama daemon.
//!
//! `HttpCompletionClient` talks to the generation endpoint, `OllamaDaemon`
//! drives the daemon's own command-line interface (listing, pulling, and the
//! start-up liveness check). Both sit behind traits so callers can swap in
//! scripted implementations.

mod backend;
mod daemon;
mod error;
mod http;
mod stream;
mod types;

pub use backend::{ChunkSink, CompletionBackend};
pub use daemon::{DaemonControl, DaemonStatus, OllamaDaemon, parse_model_listing};
pub use error::{ClientError, DaemonError};
pub use http::HttpCompletionClient;
pub use stream::NdjsonDecoder;
pub use types::{GenerateRequest, GenerateResponse};
