//! Interactive setup wizard and flag-driven config edits.

use crate::{CoreError, Prompter};
use gollama_rs_config::{GollamaConfig, ModelSlot, temperature_in_range};
use log::{debug, info};
use std::io::{BufRead, Write};

/// Upper bound on how many times details can be re-entered before giving up.
pub const MAX_SETUP_ROUNDS: usize = 5;

/// Which config file the wizard is filling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupScope {
    /// User-wide file; also asks for the daemon URL and marks setup complete.
    Global,
    /// `./.gollama/gollama.yaml` for one project.
    Workspace,
}

/// Walk the user through choosing models and temperature.
///
/// Returns the confirmed config; the caller decides where to save it.
pub fn run_setup_wizard<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    models: &[String],
    current: &GollamaConfig,
    scope: SetupScope,
) -> Result<GollamaConfig, CoreError> {
    if models.is_empty() {
        return Err(CoreError::NoModelsInstalled);
    }

    for round in 1..=MAX_SETUP_ROUNDS {
        debug!("setup round {round} (scope={scope:?})");
        let mut draft = current.clone();

        if scope == SetupScope::Global {
            let default_url = current.ollama_url().to_string();
            draft.ollama_url = read_url(prompter, &default_url)?;
        }

        prompter.list_models(models)?;
        for slot in ModelSlot::ALL {
            let model = prompter.select_model(slot.label(), models)?;
            draft.set_model(slot, model);
        }

        prompter.temperature_guidance()?;
        draft.temperature = prompter.read_temperature()?;

        prompter.say("\nPlease confirm the details you entered:")?;
        display_config(prompter.output(), &draft, scope)?;
        if prompter.confirm("Are these details correct? (y/n): ")? {
            if scope == SetupScope::Global {
                draft.setup_completed = true;
            }
            info!("setup confirmed (scope={scope:?}, round={round})");
            return Ok(draft);
        }
        prompter.say("Let's re-enter the details.")?;
    }

    Err(CoreError::SetupAborted(MAX_SETUP_ROUNDS))
}

fn read_url<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    default: &str,
) -> Result<String, CoreError> {
    let prompt = format!("Enter the Ollama URL [{default}]: ");
    loop {
        let url = prompter.read_with_default(&prompt, default)?;
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url);
        }
        prompter.say("Invalid URL. Please enter a URL starting with http:// or https://.")?;
    }
}

/// Print a config the way the wizard and `gollama config` show it.
pub fn display_config<W: Write>(
    out: &mut W,
    config: &GollamaConfig,
    scope: SetupScope,
) -> Result<(), CoreError> {
    match scope {
        SetupScope::Global => {
            writeln!(out, "Current Global Configuration:")?;
            writeln!(out, "  Ollama URL: {}", config.ollama_url())?;
        }
        SetupScope::Workspace => {
            writeln!(out, "Workspace Configuration:")?;
            writeln!(out, "  Project Name: {}", config.project_name)?;
        }
    }
    for slot in ModelSlot::ALL {
        let model = config.model(slot);
        let model = if model.is_empty() { "(not set)" } else { model };
        writeln!(out, "  {} Model: {model}", slot.label())?;
    }
    match config.temperature() {
        Some(temperature) => writeln!(out, "  Temperature: {temperature:.2}")?,
        None => writeln!(out, "  Temperature: (not set)")?,
    }
    if scope == SetupScope::Global {
        writeln!(out, "  Setup Completed: {}", config.setup_completed)?;
    }
    Ok(())
}

/// Check that `model` is installed.
pub fn validate_model(model: &str, available: &[String]) -> Result<(), CoreError> {
    if available.iter().any(|candidate| candidate == model) {
        Ok(())
    } else {
        Err(CoreError::UnknownModel(model.to_string()))
    }
}

/// Field changes requested through `gollama config` flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigUpdate {
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub tertiary: Option<String>,
    pub temperature: Option<f64>,
    pub ollama_url: Option<String>,
}

impl ConfigUpdate {
    /// Whether no flag was given.
    pub fn is_empty(&self) -> bool {
        *self == ConfigUpdate::default()
    }

    fn model(&self, slot: ModelSlot) -> Option<&str> {
        match slot {
            ModelSlot::Primary => self.primary.as_deref(),
            ModelSlot::Secondary => self.secondary.as_deref(),
            ModelSlot::Tertiary => self.tertiary.as_deref(),
        }
    }

    /// Validate every requested change, then apply them to `config`.
    ///
    /// Nothing is applied if any value is rejected. Returns whether the config
    /// actually changed.
    pub fn apply(
        &self,
        config: &mut GollamaConfig,
        available: &[String],
    ) -> Result<bool, CoreError> {
        for slot in ModelSlot::ALL {
            if let Some(model) = self.model(slot) {
                validate_model(model, available)?;
            }
        }
        if let Some(temperature) = self.temperature
            && !temperature_in_range(temperature)
        {
            return Err(CoreError::InvalidTemperature(temperature));
        }

        let mut updated = config.clone();
        for slot in ModelSlot::ALL {
            if let Some(model) = self.model(slot) {
                updated.set_model(slot, model);
            }
        }
        if let Some(temperature) = self.temperature {
            updated.temperature = temperature;
        }
        if let Some(url) = &self.ollama_url {
            updated.ollama_url = url.trim().to_string();
        }
        updated.validate()?;

        let changed = updated != *config;
        *config = updated;
        Ok(changed)
    }
}
