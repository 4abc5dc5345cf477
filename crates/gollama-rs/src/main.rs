use clap::Parser;
use gollama_rs::cli::Cli;
use log::info;

/// Entry point for the `gollama` CLI.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    gollama_rs::init_logging();

    let cli = Cli::parse();
    info!(
        "starting gollama (config_set={}, command={:?})",
        cli.config.is_some(),
        cli.command
    );
    gollama_rs::commands::run(cli).await
}
