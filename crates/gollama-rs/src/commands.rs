//! Command handlers wiring the terminal, config store and daemon together.
//!
//! `run` resolves the real daemon, terminal and working directory; the
//! handlers below take them as arguments.

use crate::cli::{ChatArgs, Cli, Command, ConfigArgs, InitArgs, UpdateArgs};
use anyhow::{Context, bail};
use gollama_rs_client::{DaemonControl, DaemonStatus, HttpCompletionClient, OllamaDaemon};
use gollama_rs_config::{GollamaConfig, LayeredConfigOptions, workspace_config_path};
use gollama_rs_core::{
    ChatSession, Prompter, SetupScope, display_config, run_setup_wizard, run_update,
};
use log::{debug, info, warn};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const INSTALL_HINT: &str =
    "Ollama is not installed or not on PATH. Install it from https://ollama.com/download";

/// Run one parsed command against the real terminal and daemon.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let daemon = OllamaDaemon::new();
    if !daemon.is_installed() {
        bail!(INSTALL_HINT);
    }
    match daemon
        .ensure_running()
        .await
        .context("failed to start the Ollama daemon")?
    {
        DaemonStatus::Started => println!("Ollama was not running; started it."),
        DaemonStatus::AlreadyRunning => debug!("daemon already running"),
    }

    let (mut global, global_path) = GollamaConfig::load_global(cli.config.as_deref())
        .context("failed to load global config")?;
    info!("global config loaded (path={})", global_path.display());

    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    if !global.setup_completed && !matches!(cli.command, Command::Config(_)) {
        prompter.say("Gollama has not been set up yet. Let's do that first.")?;
        global = global_setup(&daemon, &mut prompter, &global, &global_path).await?;
    }

    match cli.command {
        Command::Chat(args) => chat(&args, &cwd, &global_path, &mut prompter).await,
        Command::Config(args) => {
            config(&args, &daemon, &global, &global_path, &mut prompter).await
        }
        Command::Init(args) => {
            init(&args, &daemon, &cwd, &mut prompter).await?;
            Ok(())
        }
        Command::Update(args) => update(&args, &daemon, &mut prompter).await,
    }
}

async fn chat<R, W>(
    args: &ChatArgs,
    cwd: &Path,
    global_path: &Path,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()>
where
    R: BufRead,
    W: Write + Send,
{
    let layered = GollamaConfig::load_layered_with_options(
        LayeredConfigOptions::new(cwd).with_global_path(global_path),
    )
    .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    let config = layered.config;

    let selection = args.selection(&config)?;
    let initial_prompt = args.initial_prompt();
    if initial_prompt.is_none() {
        prompter.say("Starting interactive chat. Type 'bye' or 'exit' to quit.")?;
    }

    let client = HttpCompletionClient::new(config.ollama_url());
    let mut session = ChatSession::new(client, selection)
        .with_mode(args.response_mode())
        .with_temperature(config.temperature());
    session.run(prompter, initial_prompt).await?;
    Ok(())
}

/// Show, edit or update the global config at `global_path`.
///
/// With flags, the file is rewritten only when a value actually changed.
pub async fn config<D, R, W>(
    args: &ConfigArgs,
    daemon: &D,
    global: &GollamaConfig,
    global_path: &Path,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()>
where
    D: DaemonControl + ?Sized,
    R: BufRead,
    W: Write,
{
    if !global.setup_completed {
        global_setup(daemon, prompter, global, global_path).await?;
        return Ok(());
    }

    let update = args.update();
    if update.is_empty() {
        display_config(prompter.output(), global, SetupScope::Global)?;
        if prompter.confirm("Do you want to edit the configuration? (y/n): ")? {
            global_setup(daemon, prompter, global, global_path).await?;
        }
        return Ok(());
    }

    let available = daemon
        .list_models()
        .await
        .context("failed to list installed models")?;
    let mut updated = global.clone();
    if update.apply(&mut updated, &available)? {
        updated
            .save(global_path)
            .with_context(|| format!("failed to save config to {}", global_path.display()))?;
        prompter.say("Configuration updated successfully.")?;
    } else {
        prompter.say("No changes made to the configuration.")?;
    }
    Ok(())
}

/// Run the workspace wizard for `cwd` and save `./.gollama/gollama.yaml`.
///
/// The project name comes from `--project`, then the directory name, then a
/// prompt. Returns the path written.
pub async fn init<D, R, W>(
    args: &InitArgs,
    daemon: &D,
    cwd: &Path,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<PathBuf>
where
    D: DaemonControl + ?Sized,
    R: BufRead,
    W: Write,
{
    let project_name = match &args.project {
        Some(name) => name.clone(),
        None => match cwd.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => loop {
                let name = prompter.read_line("Enter the project name: ")?;
                if !name.is_empty() {
                    break name;
                }
            },
        },
    };

    let path = workspace_config_path(cwd);
    let mut current = if path.exists() {
        GollamaConfig::load_from_path(&path)
            .with_context(|| format!("failed to load {}", path.display()))?
    } else {
        GollamaConfig::default()
    };
    current.project_name = project_name;

    let models = daemon
        .list_models()
        .await
        .context("failed to list installed models")?;
    let config = run_setup_wizard(prompter, &models, &current, SetupScope::Workspace)?;
    config
        .save(&path)
        .with_context(|| format!("failed to save workspace config to {}", path.display()))?;
    prompter.say(format!(
        "Workspace configuration saved to {}.",
        path.display()
    ))?;
    Ok(path)
}

async fn update<D, R, W>(
    args: &UpdateArgs,
    daemon: &D,
    prompter: &mut Prompter<R, W>,
) -> anyhow::Result<()>
where
    D: DaemonControl + ?Sized,
    R: BufRead,
    W: Write,
{
    let report = run_update(daemon, args.mode(), prompter)
        .await
        .context("failed to update models")?;
    if !report.failed.is_empty() {
        warn!("{} model update(s) failed", report.failed.len());
    }
    Ok(())
}

/// Run the global wizard against the installed models and persist the result.
pub async fn global_setup<D, R, W>(
    daemon: &D,
    prompter: &mut Prompter<R, W>,
    current: &GollamaConfig,
    path: &Path,
) -> anyhow::Result<GollamaConfig>
where
    D: DaemonControl + ?Sized,
    R: BufRead,
    W: Write,
{
    let models = daemon
        .list_models()
        .await
        .context("failed to list installed models")?;
    let config = run_setup_wizard(prompter, &models, current, SetupScope::Global)?;
    config
        .save(path)
        .with_context(|| format!("failed to save config to {}", path.display()))?;
    prompter.say("Configuration saved successfully.")?;
    Ok(config)
}
