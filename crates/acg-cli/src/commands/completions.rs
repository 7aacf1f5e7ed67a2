//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use acg_core::cli::ExitCode;
use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io;
use tracing::info;

/// Writes the completion script for `shell` to stdout.
///
/// # Examples
///
/// ```no_run
/// use acg_cli::commands::completions;
/// use clap::Command;
/// use clap_complete::Shell;
///
/// let mut cmd = Command::new("acg");
/// completions::generate_completions(Shell::Bash, &mut cmd);
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    generate(shell, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Runs the completions command.
///
/// # Errors
///
/// Never fails; the `Result` keeps the signature uniform with other
/// commands.
#[allow(clippy::unnecessary_wraps)]
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    info!("Generating {shell} completions");
    generate_completions(shell, cmd);
    Ok(ExitCode::SUCCESS)
}
