//! Layered configuration loader.
//!
//! Resolves the global config file (explicit override, `GOLLAMA_CONFIG`, or the
//! per-OS default), optionally layers the workspace file `./.gollama/gollama.yaml`
//! on top of it, and produces a validated `GollamaConfig`.

mod layer_io;
mod merge;
mod schema;
mod utils;


use crate::{ConfigError, GollamaConfig, temperature_in_range};
use log::{debug, info};
use serde_yaml::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default config filename in every layer.
const DEFAULT_CONFIG_FILE: &str = "gollama.yaml";
/// Workspace config directory under the working directory.
const DEFAULT_CONFIG_DIR: &str = ".gollama";
/// Application directory under the per-OS config root.
const GLOBAL_CONFIG_DIR: &str = "Gollama";
/// Environment variable overriding the global config path.
pub const CONFIG_PATH_ENV: &str = "GOLLAMA_CONFIG";

/// Effective config plus metadata about which layers were loaded.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// The merged, validated config.
    pub config: GollamaConfig,
    /// Metadata for each layer that contributed, lowest precedence first.
    pub layers: Vec<ConfigLayer>,
}

/// Origin for a single config layer in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayerSource {
    /// User-wide configuration.
    Global,
    /// Per-workspace configuration (highest precedence).
    Workspace,
}

/// Metadata about a config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Layer origin.
    pub source: ConfigLayerSource,
    /// Location on disk, `None` when the layer only supplied defaults.
    pub path: Option<PathBuf>,
}

/// Options controlling layered config discovery.
#[derive(Debug, Clone)]
pub struct LayeredConfigOptions {
    /// Working directory used to locate the workspace layer.
    pub cwd: PathBuf,
    /// Global config path; resolved from the environment when `None`.
    pub global_config_path: Option<PathBuf>,
}

impl LayeredConfigOptions {
    /// Create options for the provided cwd with the default global location.
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        Self {
            cwd: cwd.as_ref().to_path_buf(),
            global_config_path: None,
        }
    }

    /// Use an explicit global config path instead of the default one.
    pub fn with_global_path(mut self, path: impl AsRef<Path>) -> Self {
        self.global_config_path = Some(path.as_ref().to_path_buf());
        self
    }
}

/// Location of the workspace config for a working directory.
pub fn workspace_config_path(cwd: impl AsRef<Path>) -> PathBuf {
    cwd.as_ref()
        .join(DEFAULT_CONFIG_DIR)
        .join(DEFAULT_CONFIG_FILE)
}

impl GollamaConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let path = path.as_ref();
        let value = layer_io::read_layer(path)?;
        config_from_value(value, &path.display().to_string())
    }

    /// Load a single config from YAML contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = serde_yaml::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load the global config, writing a default one when the file is missing.
    ///
    /// Resolution order: `path_override`, then `GOLLAMA_CONFIG`, then the
    /// per-OS default location. Returns the config and the resolved path.
    pub fn load_global(path_override: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let path = layer_io::resolve_global_config_path(path_override)?;
        if !path.exists() {
            info!(
                "global config missing, writing defaults (path={})",
                path.display()
            );
            let config = GollamaConfig::default();
            config.save(&path)?;
            return Ok((config, path));
        }
        let config = Self::load_from_path(&path)?;
        Ok((config, path))
    }

    /// Persist every field to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        self.validate()?;
        let contents = serde_yaml::to_string(self)?;
        layer_io::write_layer(path, &contents)?;
        info!("config saved (path={})", path.display());
        Ok(())
    }

    /// Load the workspace config layered over the global config.
    pub fn load_layered(cwd: impl AsRef<Path>) -> Result<LayeredConfig, ConfigError> {
        info!(
            "loading layered config with defaults (cwd={})",
            cwd.as_ref().display()
        );
        Self::load_layered_with_options(LayeredConfigOptions::new(cwd))
    }

    /// Load the layered config using explicit locations.
    ///
    /// Zero-valued workspace fields are filled from the global layer; non-zero
    /// workspace fields win. `setup_completed` always comes from the global layer.
    pub fn load_layered_with_options(
        options: LayeredConfigOptions,
    ) -> Result<LayeredConfig, ConfigError> {
        let cwd = utils::normalize_path(&options.cwd)?;
        debug!("normalized cwd for config load: {}", cwd.display());
        let global_path =
            layer_io::resolve_global_config_path(options.global_config_path.as_deref())?;
        let mut layers = Vec::new();
        let mut seen_paths = HashSet::new();

        let global = match layer_io::load_optional_layer(ConfigLayerSource::Global, &global_path)?
        {
            Some(value) => {
                seen_paths.insert(utils::unique_path(&global_path));
                let label = layer_io::layer_label(ConfigLayerSource::Global, &global_path);
                layers.push(ConfigLayer {
                    source: ConfigLayerSource::Global,
                    path: Some(global_path.clone()),
                });
                config_from_value(value, &label)?
            }
            None => {
                layers.push(ConfigLayer {
                    source: ConfigLayerSource::Global,
                    path: None,
                });
                GollamaConfig::default()
            }
        };

        let workspace_path = workspace_config_path(&cwd);
        if !seen_paths.insert(utils::unique_path(&workspace_path)) {
            debug!(
                "skipping duplicate layer (source={:?}, path={})",
                ConfigLayerSource::Workspace,
                workspace_path.display()
            );
            return Ok(LayeredConfig {
                config: global,
                layers,
            });
        }

        let workspace =
            layer_io::load_optional_layer(ConfigLayerSource::Workspace, &workspace_path)?;
        let config = match workspace {
            Some(value) => {
                let label = layer_io::layer_label(ConfigLayerSource::Workspace, &workspace_path);
                let mut workspace = config_from_value(value, &label)?;
                merge::fill_unset_fields(&mut workspace, &global);
                workspace.setup_completed = global.setup_completed;
                layers.push(ConfigLayer {
                    source: ConfigLayerSource::Workspace,
                    path: Some(workspace_path),
                });
                workspace
            }
            None => global,
        };

        info!("layered config loaded (layers={})", layers.len());
        Ok(LayeredConfig { config, layers })
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature != 0.0 && !temperature_in_range(self.temperature) {
            return Err(ConfigError::InvalidField {
                path: "temperature".to_string(),
                message: format!(
                    "{} is outside the accepted range 0.1 to 1.0",
                    self.temperature
                ),
            });
        }
        let url = self.ollama_url.trim();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidField {
                path: "ollama_url".to_string(),
                message: format!("{url} must start with http:// or https://"),
            });
        }
        Ok(())
    }
}

fn config_from_value(value: Value, label: &str) -> Result<GollamaConfig, ConfigError> {
    let value = schema::validate_layer_schema(value, label)?;
    let config: GollamaConfig = serde_yaml::from_value(value)?;
    config.validate()?;
    Ok(config)
}
