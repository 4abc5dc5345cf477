//! Interactive flows for Gollama.
//!
//! This crate owns the chat session loop, the setup wizard, model updates and
//! the terminal prompting they share. Everything is generic over the reader,
//! writer, completion backend and daemon so the binary can wire in stdin,
//! stdout and the real daemon while tests use in-memory fakes.

pub mod error;
pub mod prompt;
pub mod session;
pub mod setup;
pub mod update;

pub use error::CoreError;
pub use prompt::Prompter;
pub use session::{ChatSession, ModelSelection, ResponseMode, is_exit_phrase};
pub use setup::{
    ConfigUpdate, MAX_SETUP_ROUNDS, SetupScope, display_config, run_setup_wizard, validate_model,
};
pub use update::{UpdateMode, UpdateReport, run_update};
