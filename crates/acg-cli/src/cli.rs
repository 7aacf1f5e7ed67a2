//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands

use acg_core::DEFAULT_CONFIG_FILE;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// acg - API client generator.
///
/// Reads a YAML description of services and endpoints and produces an
/// installable Python client package.
#[derive(Parser, Debug)]
#[command(name = "acg")]
#[command(version, about, long_about = None)]
#[command(author = "ACG Team")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    pub format: String,
}

/// Location of the configuration document.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Configuration file
    #[arg(short, long, env = "ACG_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

/// Package location and template overrides.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory the package directory is created in
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Directory of template overrides (`<dir>/client/class.hbs`, ...)
    #[arg(long)]
    pub templates: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the client module and package skeleton.
    ///
    /// # Examples
    ///
    /// ```bash
    /// acg generate --config .acg.yml --output build/
    /// ```
    Generate {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the emission plan without writing anything.
    Plan {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Build and upload a previously generated package.
    ///
    /// Writes registry credentials to `~/.pypirc`, then builds source and
    /// wheel distributions and uploads them with twine.
    Publish {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Print the steps instead of running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate, then publish.
    Build {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Print the publish steps instead of running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}
