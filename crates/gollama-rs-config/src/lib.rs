//! Configuration models and layered config loading.
//!
//! This crate owns the Gollama config schema, validation, and the
//! workspace-over-global layering used by every command.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{
    CONFIG_PATH_ENV, ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions,
    workspace_config_path,
};
/// Configuration schema models.
pub use model::*;
