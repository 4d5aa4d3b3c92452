//! rfimatch CLI - Command-line interface
//!
//! Runs the observation/RFI correlation pipeline against live archives and a
//! satellite service.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            errors::CliError::new(format!("Failed to start async runtime: {}", e)).display();
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let watcher = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping at the next checkpoint");
                watcher.cancel();
            }
        });

        commands::execute(cli, cancel).await
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            errors::from_anyhow(&e).display();
            ExitCode::FAILURE
        }
    }
}
