mod cli;
mod commands;
mod interactive;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use claude_sync_core::{Reporter, SyncError};
use cli::{Cli, Mode};
use commands::Workspace;
use tracing_subscriber::EnvFilter;

/// Standard exit code for SIGINT
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) if SyncError::is_cancellation(&e) => {
            eprintln!("\nOperation cancelled by user");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        let _ = dialoguer::console::Term::stderr().show_cursor();
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(i32::from(EXIT_INTERRUPTED));
    })
    .context("Failed to set Ctrl+C handler")?;

    let workspace = Workspace::load(cli)?;
    let reporter = Reporter::new(console::colors_enabled());

    match cli.mode() {
        Mode::Audit => {
            commands::Audit::execute(cli, &workspace, reporter).context("Failed to execute audit")?;
            Ok(true)
        }
        Mode::Sync(direction) => commands::Sync::execute(cli, &workspace, direction, reporter)
            .with_context(|| format!("Failed to execute {direction} sync")),
        Mode::Settings => {
            commands::Settings::execute(&workspace, reporter)
                .context("Failed to execute settings analysis")?;
            Ok(true)
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked from the flags
fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        "debug"
    } else if cli.dry_run {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
