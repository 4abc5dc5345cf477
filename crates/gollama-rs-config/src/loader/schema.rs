//! Schema validation helpers for Gollama YAML configuration.

use crate::ConfigError;
use serde_yaml::{Mapping, Value};

const STRING_KEYS: &[&str] = &[
    "project_name",
    "ollama_url",
    "primary_model",
    "secondary_model",
    "tertiary_model",
];
const NUMBER_KEYS: &[&str] = &["temperature"];
const BOOL_KEYS: &[&str] = &["setup_completed"];

/// Validate a single config layer and return it ready for deserialization.
///
/// An empty document is treated as an empty mapping and `null` entries are
/// dropped so they fall back to the field's zero value.
pub(super) fn validate_layer_schema(value: Value, layer: &str) -> Result<Value, ConfigError> {
    let map = match value {
        Value::Null => return Ok(Value::Mapping(Mapping::new())),
        Value::Mapping(map) => map,
        _ => {
            return Err(ConfigError::Invalid(format!(
                "{layer}: expected a mapping at the top level"
            )));
        }
    };

    let mut cleaned = Mapping::new();
    for (key, value) in map {
        let Some(name) = key.as_str() else {
            return Err(ConfigError::Invalid(format!("{layer}: keys must be strings")));
        };
        if value.is_null() {
            continue;
        }
        if STRING_KEYS.contains(&name) {
            expect_string(&value, layer, name)?;
        } else if NUMBER_KEYS.contains(&name) {
            expect_f64(&value, layer, name)?;
        } else if BOOL_KEYS.contains(&name) {
            expect_bool(&value, layer, name)?;
        } else {
            return Err(invalid_field(layer, name, "unknown key"));
        }
        cleaned.insert(key, value);
    }
    Ok(Value::Mapping(cleaned))
}

/// Expect a YAML string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a YAML boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_bool() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Expect a YAML number or return a typed error.
fn expect_f64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected number"))
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
