//! Model updates through the daemon's pull command.

use crate::{CoreError, Prompter};
use gollama_rs_client::DaemonControl;
use log::{info, warn};
use std::io::{BufRead, Write};

const PICKER_PROMPT: &str = "Enter the number of the model to update, or type 'exit' to stop: ";

/// Which models an update run targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateMode {
    /// Every installed model.
    All,
    /// One named model.
    Specific(String),
    /// Pick models one at a time from a numbered list.
    Interactive,
}

/// Outcome of an update run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub updated: Vec<String>,
    /// Model name paired with the failure message.
    pub failed: Vec<(String, String)>,
}

/// Pull models according to `mode`, printing progress through `prompter`.
///
/// A failed pull is recorded and reported; later models are still attempted.
pub async fn run_update<D, R, W>(
    daemon: &D,
    mode: UpdateMode,
    prompter: &mut Prompter<R, W>,
) -> Result<UpdateReport, CoreError>
where
    D: DaemonControl + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut report = UpdateReport::default();
    match mode {
        UpdateMode::All => {
            let models = daemon.list_models().await?;
            if models.is_empty() {
                prompter.say("No models installed.")?;
                return Ok(report);
            }
            prompter.say("Updating all models...")?;
            for model in &models {
                pull_one(daemon, model, prompter, &mut report).await?;
            }
        }
        UpdateMode::Specific(model) => {
            prompter.say(format!("Updating model {model}..."))?;
            pull_one(daemon, &model, prompter, &mut report).await?;
        }
        UpdateMode::Interactive => {
            let models = daemon.list_models().await?;
            if models.is_empty() {
                prompter.say("No models installed.")?;
                return Ok(report);
            }
            loop {
                prompter.list_models(&models)?;
                let Some(input) = prompter.try_read_line(PICKER_PROMPT)? else {
                    break;
                };
                if input.eq_ignore_ascii_case("exit") {
                    prompter.say("Exiting update prompt.")?;
                    break;
                }
                match parse_index(&input, models.len()) {
                    Ok(index) => {
                        let model = &models[index];
                        prompter.say(format!("Updating model {model}..."))?;
                        pull_one(daemon, model, prompter, &mut report).await?;
                    }
                    Err(reason) => prompter.say(format!("Invalid input: {reason}"))?,
                }
            }
        }
    }
    info!(
        "update finished (updated={}, failed={})",
        report.updated.len(),
        report.failed.len()
    );
    Ok(report)
}

async fn pull_one<D, R, W>(
    daemon: &D,
    model: &str,
    prompter: &mut Prompter<R, W>,
    report: &mut UpdateReport,
) -> Result<(), CoreError>
where
    D: DaemonControl + ?Sized,
    R: BufRead,
    W: Write,
{
    match daemon.pull_model(model).await {
        Ok(()) => {
            prompter.say(format!("Successfully updated model {model}."))?;
            report.updated.push(model.to_string());
        }
        Err(err) => {
            warn!("pull failed (model={model}): {err}");
            prompter.say(format!("Failed to update model {model}: {err}"))?;
            report.failed.push((model.to_string(), err.to_string()));
        }
    }
    Ok(())
}

/// Turn a 1-based answer into an index below `len`.
fn parse_index(input: &str, len: usize) -> Result<usize, String> {
    let index = input
        .trim()
        .parse::<usize>()
        .map_err(|_| "please enter a number".to_string())?;
    if index == 0 || index > len {
        return Err(format!("please enter a number between 1 and {len}"));
    }
    Ok(index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn index_bounds() {
        assert_eq!(parse_index("1", 3), Ok(0));
        assert_eq!(parse_index(" 3 ", 3), Ok(2));
        assert_eq!(
            parse_index("4", 3),
            Err("please enter a number between 1 and 3".to_string())
        );
        assert_eq!(parse_index("x", 3), Err("please enter a number".to_string()));
    }
}
