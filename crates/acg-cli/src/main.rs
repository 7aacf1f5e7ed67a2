//! API client generator CLI.
//!
//! # Examples
//!
//! ```bash
//! # Write the package for the services described in .acg.yml
//! acg generate
//!
//! # Inspect what would be emitted
//! acg plan --config api.yml --format json
//!
//! # Generate and upload
//! acg build --output build/
//! ```

use acg_cli::Cli;
use acg_cli::runner::{execute_command, exit_code_for, init_logging};
use acg_core::cli::OutputFormat;
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: Cli) -> Result<acg_core::cli::ExitCode> {
    init_logging(cli.verbose)?;

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow!("{e}"))?;

    execute_command(cli.command, output_format)
}
