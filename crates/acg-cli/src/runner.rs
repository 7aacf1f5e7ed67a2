//! Command execution and runtime logic.
//!
//! Contains the command dispatch and logging initialization.

use acg_core::cli::{ExitCode, OutputFormat};
use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands;

/// Initializes logging infrastructure.
///
/// Sets up tracing with appropriate log levels based on verbosity flag.
/// Logs go to stderr so command output on stdout stays parseable.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

/// Executes the specified CLI command.
///
/// Routes commands to their respective handlers and returns an exit code.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Generate { config, output } => {
            commands::generate::run(&config, &output, output_format)
        }
        Commands::Plan { config } => commands::plan::run(&config, output_format),
        Commands::Publish {
            config,
            output,
            dry_run,
        } => commands::publish::run(&config, &output, dry_run, output_format),
        Commands::Build {
            config,
            output,
            dry_run,
        } => commands::build::run(&config, &output, dry_run, output_format),
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}

/// Exit code for a failed command.
///
/// Looks through the context chain for a generator error; anything else is
/// a general failure.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<acg_core::Error>())
        .map_or(ExitCode::ERROR, ExitCode::for_error)
}
