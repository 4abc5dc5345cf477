//! The `gollama` command-line application.
//!
//! This crate re-exports the building blocks it wires together and exposes
//! the command surface so it can be exercised without a terminal.

/// Re-export for convenience.
pub use gollama_rs_client as client;
pub use gollama_rs_config as config;
pub use gollama_rs_core as core;

pub mod cli;
pub mod commands;

use std::fs::OpenOptions;

/// Environment variable naming a file that receives log output.
pub const LOG_FILE_ENV: &str = "GOLLAMA_LOG_FILE";

/// Initialize `env_logger`.
///
/// Defaults to `warn` so diagnostics stay out of chat output; `RUST_LOG`
/// overrides the filter. When `GOLLAMA_LOG_FILE` is set, records are appended
/// to that file instead of stderr.
pub fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Warn)
        .format_timestamp_millis()
        .parse_default_env();

    if let Some(path) = std::env::var_os(LOG_FILE_ENV) {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(err) => eprintln!(
                "warning: cannot open log file {}: {err}",
                std::path::Path::new(&path).display()
            ),
        }
    }
    let _ = builder.try_init();
}
