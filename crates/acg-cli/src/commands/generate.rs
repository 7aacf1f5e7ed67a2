//! Generate command implementation.
//!
//! Loads the configuration, builds the client module and package skeleton,
//! and writes them under `<output>/<name>/`. Running it again with the same
//! configuration rewrites identical files.

use super::common::{build_engine, load_configuration};
use crate::cli::{ConfigArgs, OutputArgs};
use acg_codegen::ClientGenerator;
use acg_codegen::plan::InstructionKind;
use acg_core::Configuration;
use acg_core::cli::{ExitCode, OutputFormat};
use acg_files::{FilesBuilder, expand_tilde};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Result of a generation run.
#[derive(Debug, Serialize)]
pub struct GenerationResult {
    /// Package name
    pub package: String,
    /// Package version
    pub version: String,
    /// Directory the package was written to
    pub package_dir: String,
    /// Client module, relative to the output directory
    pub client_module: String,
    /// Every written file, relative to the output directory
    pub files: Vec<String>,
    /// Number of emitted classes, root client included
    pub classes: usize,
    /// Number of emitted request methods
    pub requests: usize,
}

/// Generates the package for `config` and writes it under `output`.
///
/// # Errors
///
/// Returns an error if planning, rendering, or writing fails.
pub fn generate_package(
    config: &Configuration,
    generator: &ClientGenerator,
    output: &Path,
) -> Result<GenerationResult> {
    let name = config.package_name();
    let package = generator
        .generate(config)
        .with_context(|| format!("failed to generate package '{name}'"))?;

    let base = expand_tilde(output)?;
    let target = base.join(name);

    let classes = package.plan.count(InstructionKind::DefineClass)
        + package.plan.count(InstructionKind::DefineRootClient);
    let requests = package.plan.count(InstructionKind::DefineRequest);
    let client_module = format!("{name}/{}", package.client_path);

    let tree = FilesBuilder::from_generated_code(package.code, format!("/{name}"))
        .build_and_export(&base)
        .with_context(|| format!("failed to write package to {}", target.display()))?;

    info!(
        "Wrote {} files ({} bytes) to {}",
        tree.file_count(),
        tree.total_bytes(),
        target.display()
    );

    Ok(GenerationResult {
        package: name.to_string(),
        version: config.generator.version.clone(),
        package_dir: target.display().to_string(),
        client_module,
        files: tree
            .all_paths()
            .into_iter()
            .map(|path| path.relative().to_string())
            .collect(),
        classes,
        requests,
    })
}

/// Runs the generate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the package cannot
/// be written.
pub fn run(config: &ConfigArgs, output: &OutputArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let configuration = load_configuration(&config.config)?;
    let generator = ClientGenerator::with_engine(build_engine(output.templates.as_deref())?);

    info!(
        "Generating client for {} ({} services)",
        configuration.package_name(),
        configuration.generator.services.len()
    );

    let result = generate_package(&configuration, &generator, &output.output)?;

    let formatted = crate::formatters::format_output(&result, output_format)?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}
