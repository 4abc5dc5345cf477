//! Configuration schema for Gollama.

use serde::{Deserialize, Serialize};

/// Daemon endpoint used when no URL has been configured.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/";
/// Lowest accepted sampling temperature.
pub const MIN_TEMPERATURE: f64 = 0.1;
/// Highest accepted sampling temperature.
pub const MAX_TEMPERATURE: f64 = 1.0;

/// Root config shared by the global and workspace files.
///
/// Every field has a zero value (empty string, `0.0`, `false`) meaning
/// "not set"; layering fills zero-valued workspace fields from the global file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GollamaConfig {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub ollama_url: String,
    #[serde(default)]
    pub primary_model: String,
    #[serde(default)]
    pub secondary_model: String,
    #[serde(default)]
    pub tertiary_model: String,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub setup_completed: bool,
}

impl GollamaConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> GollamaConfigBuilder {
        GollamaConfigBuilder::new()
    }

    /// Daemon base URL, falling back to the local default.
    pub fn ollama_url(&self) -> &str {
        if self.ollama_url.trim().is_empty() {
            DEFAULT_OLLAMA_URL
        } else {
            self.ollama_url.trim()
        }
    }

    /// Temperature to send with requests, `None` while unset.
    pub fn temperature(&self) -> Option<f64> {
        if self.temperature == 0.0 {
            None
        } else {
            Some(self.temperature)
        }
    }

    /// Model name for a slot.
    pub fn model(&self, slot: ModelSlot) -> &str {
        match slot {
            ModelSlot::Primary => &self.primary_model,
            ModelSlot::Secondary => &self.secondary_model,
            ModelSlot::Tertiary => &self.tertiary_model,
        }
    }

    /// Replace the model name for a slot.
    pub fn set_model(&mut self, slot: ModelSlot, model: impl Into<String>) {
        let model = model.into();
        match slot {
            ModelSlot::Primary => self.primary_model = model,
            ModelSlot::Secondary => self.secondary_model = model,
            ModelSlot::Tertiary => self.tertiary_model = model,
        }
    }

    /// Configured slots in primary, secondary, tertiary order, skipping empty ones.
    pub fn configured_models(&self) -> Vec<String> {
        ModelSlot::ALL
            .iter()
            .map(|slot| self.model(*slot))
            .filter(|model| !model.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Check that a temperature lies in the accepted range.
pub fn temperature_in_range(value: f64) -> bool {
    (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value)
}

/// One of the three configured model slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSlot {
    Primary,
    Secondary,
    Tertiary,
}

impl ModelSlot {
    /// All slots in precedence order.
    pub const ALL: [ModelSlot; 3] = [ModelSlot::Primary, ModelSlot::Secondary, ModelSlot::Tertiary];

    /// Human readable slot label.
    pub fn label(self) -> &'static str {
        match self {
            ModelSlot::Primary => "Primary",
            ModelSlot::Secondary => "Secondary",
            ModelSlot::Tertiary => "Tertiary",
        }
    }
}

/// Builder for assembling a `GollamaConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct GollamaConfigBuilder {
    config: GollamaConfig,
}

impl GollamaConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: GollamaConfig::default(),
        }
    }

    /// Set the workspace project name.
    pub fn project_name(mut self, name: impl Into<String>) -> Self {
        self.config.project_name = name.into();
        self
    }

    /// Set the daemon base URL.
    pub fn ollama_url(mut self, url: impl Into<String>) -> Self {
        self.config.ollama_url = url.into();
        self
    }

    /// Set the primary model.
    pub fn primary_model(mut self, model: impl Into<String>) -> Self {
        self.config.primary_model = model.into();
        self
    }

    /// Set the secondary model.
    pub fn secondary_model(mut self, model: impl Into<String>) -> Self {
        self.config.secondary_model = model.into();
        self
    }

    /// Set the tertiary model.
    pub fn tertiary_model(mut self, model: impl Into<String>) -> Self {
        self.config.tertiary_model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Mark the interactive setup as done.
    pub fn setup_completed(mut self, done: bool) -> Self {
        self.config.setup_completed = done;
        self
    }

    /// Finalize and return the built `GollamaConfig`.
    pub fn build(self) -> GollamaConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn configured_models_skip_empty_slots() {
        let config = GollamaConfig::builder()
            .primary_model("llama3.2:3b")
            .tertiary_model("mistral:7b")
            .build();
        assert_eq!(
            config.configured_models(),
            vec!["llama3.2:3b".to_string(), "mistral:7b".to_string()]
        );
    }

    #[test]
    fn unset_url_and_temperature_fall_back() {
        let config = GollamaConfig::default();
        assert_eq!(config.ollama_url(), DEFAULT_OLLAMA_URL);
        assert_eq!(config.temperature(), None);
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        assert!(temperature_in_range(0.1));
        assert!(temperature_in_range(1.0));
        assert!(!temperature_in_range(0.05));
        assert!(!temperature_in_range(1.5));
    }
}
