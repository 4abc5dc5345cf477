//! Test helpers shared across Gollama crates.

pub mod backend;
pub mod daemon;

pub use backend::{FailingBackend, ScriptedBackend};
pub use daemon::StubDaemon;
