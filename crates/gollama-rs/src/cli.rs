//! Command-line surface.

use clap::{Args, Parser, Subcommand};
use gollama_rs_config::{GollamaConfig, ModelSlot};
use gollama_rs_core::{ConfigUpdate, CoreError, ModelSelection, ResponseMode, UpdateMode};
use std::path::PathBuf;

/// Chat with and manage local Ollama models.
#[derive(Debug, Parser)]
#[command(name = "gollama", version)]
pub struct Cli {
    /// Use this global config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chat with the configured models
    Chat(ChatArgs),
    /// Show or change the global configuration
    Config(ConfigArgs),
    /// Create a workspace configuration in ./.gollama
    Init(InitArgs),
    /// Pull updates for installed models
    Update(UpdateArgs),
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Prompt for the first turn; starts interactively when omitted
    #[arg(value_name = "PROMPT")]
    pub prompt: Vec<String>,
    /// Wait for whole responses instead of streaming them
    #[arg(short, long)]
    pub response: bool,
    /// Chat with the secondary model
    #[arg(short, long)]
    pub secondary: bool,
    /// Chat with the tertiary model
    #[arg(short, long)]
    pub tertiary: bool,
    /// Compare all configured models
    #[arg(short, long)]
    pub all: bool,
}

impl ChatArgs {
    /// Prompt words joined by spaces, `None` when there are none.
    pub fn initial_prompt(&self) -> Option<String> {
        let prompt = self.prompt.join(" ");
        let prompt = prompt.trim();
        (!prompt.is_empty()).then(|| prompt.to_string())
    }

    pub fn response_mode(&self) -> ResponseMode {
        if self.response {
            ResponseMode::Whole
        } else {
            ResponseMode::Stream
        }
    }

    /// Resolve the flags against the configured model slots.
    ///
    /// `--all` wins, then `--secondary`, then `--tertiary`; the primary model
    /// is the default. `--all` with a single configured model chats with it
    /// alone.
    pub fn selection(&self, config: &GollamaConfig) -> Result<ModelSelection, CoreError> {
        if self.all {
            let mut models = config.configured_models();
            return match models.len() {
                0 => Err(CoreError::MissingModel(ModelSlot::Primary.label())),
                1 => Ok(ModelSelection::Single(models.remove(0))),
                _ => Ok(ModelSelection::All(models)),
            };
        }
        let slot = if self.secondary {
            ModelSlot::Secondary
        } else if self.tertiary {
            ModelSlot::Tertiary
        } else {
            ModelSlot::Primary
        };
        let model = config.model(slot);
        if model.is_empty() {
            return Err(CoreError::MissingModel(slot.label()));
        }
        Ok(ModelSelection::Single(model.to_string()))
    }
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Set the primary model
    #[arg(short, long, value_name = "MODEL")]
    pub primary: Option<String>,
    /// Set the secondary model
    #[arg(short, long, value_name = "MODEL")]
    pub secondary: Option<String>,
    /// Set the tertiary model
    #[arg(short, long, value_name = "MODEL")]
    pub tertiary: Option<String>,
    /// Set the sampling temperature (0.1 to 1.0)
    #[arg(long, value_name = "TEMP")]
    pub temp: Option<f64>,
    /// Set the Ollama daemon URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
}

impl ConfigArgs {
    pub fn update(&self) -> ConfigUpdate {
        ConfigUpdate {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
            tertiary: self.tertiary.clone(),
            temperature: self.temp,
            ollama_url: self.url.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name; defaults to the current directory name
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Update every installed model
    #[arg(short, long, conflicts_with = "model")]
    pub all: bool,
    /// Update one model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,
}

impl UpdateArgs {
    pub fn mode(&self) -> UpdateMode {
        match (&self.model, self.all) {
            (_, true) => UpdateMode::All,
            (Some(model), false) => UpdateMode::Specific(model.clone()),
            (None, false) => UpdateMode::Interactive,
        }
    }
}
