//! Gemforge CLI - gem activation for O3DE-style projects
//!
//! This is the main entry point for the gemforge command-line interface.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::EnableGem(args) => commands::enable_gem::run(args),
        Commands::DisableGem(args) => commands::disable_gem::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&format!("{err:#}"));
            exit_code(&err)
        }
    }
}

/// Exit 2 marks "the gem was not enabled to begin with"; every other
/// failure is exit 1.
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<gemforge_core::Error>() {
        Some(gemforge_core::Error::GemNotEnabled { .. }) => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
