//! IO helpers for reading and writing config layers on disk.

use super::{CONFIG_PATH_ENV, ConfigLayerSource, DEFAULT_CONFIG_FILE, GLOBAL_CONFIG_DIR};
use crate::ConfigError;
use directories::UserDirs;
use log::debug;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Load an optional layer if the provided path exists.
pub(super) fn load_optional_layer(
    source: ConfigLayerSource,
    path: &Path,
) -> Result<Option<Value>, ConfigError> {
    if !path.exists() {
        debug!(
            "optional layer missing (source={:?}, path={})",
            source,
            path.display()
        );
        return Ok(None);
    }

    debug!(
        "loading config layer (source={:?}, path={})",
        source,
        path.display()
    );
    Ok(Some(read_layer(path)?))
}

/// Read and parse a YAML layer from disk.
pub(super) fn read_layer(path: &Path) -> Result<Value, ConfigError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Write serialized layer contents, creating parent directories first.
pub(super) fn write_layer(path: &Path, contents: &str) -> Result<(), ConfigError> {
    let write_failed = |source| ConfigError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }
    fs::write(path, contents).map_err(write_failed)
}

/// Build a user-friendly label for schema validation errors.
pub(super) fn layer_label(source: ConfigLayerSource, path: &Path) -> String {
    let name = match source {
        ConfigLayerSource::Global => "global",
        ConfigLayerSource::Workspace => "workspace",
    };
    format!("{name}({})", path.display())
}

/// Resolve the global config path: explicit override, environment, then OS default.
pub(super) fn resolve_global_config_path(
    path_override: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path_override {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|value| !value.is_empty()) {
        debug!("global config path taken from {CONFIG_PATH_ENV}");
        return Ok(PathBuf::from(path));
    }
    default_global_config_path().ok_or(ConfigError::HomeDirUnavailable)
}

/// Default global config path under the home directory.
pub(super) fn default_global_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| global_config_root(dirs.home_dir()))
}

#[cfg(windows)]
fn global_config_root(home: &Path) -> PathBuf {
    home.join("AppData")
        .join("Roaming")
        .join(GLOBAL_CONFIG_DIR)
        .join(DEFAULT_CONFIG_FILE)
}

#[cfg(not(windows))]
fn global_config_root(home: &Path) -> PathBuf {
    home.join(".config")
        .join(GLOBAL_CONFIG_DIR)
        .join(DEFAULT_CONFIG_FILE)
}
