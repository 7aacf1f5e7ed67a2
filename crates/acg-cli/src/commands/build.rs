//! Build command implementation.
//!
//! Generates the package, then publishes it.

use super::common::{build_engine, load_configuration};
use super::generate::{GenerationResult, generate_package};
use super::publish::publish_package;
use crate::cli::{ConfigArgs, OutputArgs};
use crate::publish::{PublishReport, SystemRunner, default_pypirc_path};
use acg_codegen::ClientGenerator;
use acg_core::cli::{ExitCode, OutputFormat};
use anyhow::Result;
use serde::Serialize;
use tracing::info;

/// Result of a build run.
#[derive(Debug, Serialize)]
pub struct BuildResult {
    /// What was generated
    pub generated: GenerationResult,
    /// What was published
    pub published: PublishReport,
}

/// Runs the build command.
///
/// Publishing only starts once every file has been written.
///
/// # Errors
///
/// Returns an error if generation or publishing fails.
pub fn run(
    config: &ConfigArgs,
    output: &OutputArgs,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let configuration = load_configuration(&config.config)?;
    let generator = ClientGenerator::with_engine(build_engine(output.templates.as_deref())?);

    let generated = generate_package(&configuration, &generator, &output.output)?;
    info!("Generated {}, publishing", generated.package_dir);

    let pypirc = default_pypirc_path()?;
    let published = publish_package(
        &configuration,
        generator.engine(),
        SystemRunner,
        &output.output,
        &pypirc,
        dry_run,
    )?;

    let result = BuildResult {
        generated,
        published,
    };
    let formatted = crate::formatters::format_output(&result, output_format)?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::super::common::test_support::write_config;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_dry_run_generates_without_publishing() {
        let temp = TempDir::new().unwrap();
        let config = ConfigArgs {
            config: write_config(temp.path()),
        };
        let output = OutputArgs {
            output: temp.path().join("out"),
            templates: None,
        };

        let code = run(&config, &output, true, OutputFormat::Text).unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(temp.path().join("out/demo/setup.py").is_file());
        assert!(!temp.path().join("out/demo/dist").exists());
    }
}
