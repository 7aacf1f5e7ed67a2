//! Plan command implementation.
//!
//! Prints the emission plan for a configuration without rendering or
//! writing anything.

use super::common::load_configuration;
use crate::cli::ConfigArgs;
use acg_codegen::{ClientGenerator, EmissionPlan};
use acg_core::cli::{ExitCode, OutputFormat};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// Plan summary as printed by the command.
#[derive(Debug, Serialize)]
pub struct PlanSummary {
    /// Package name
    pub package: String,
    /// Number of instructions
    pub instruction_count: usize,
    /// One line per instruction, in emission order
    pub instructions: Vec<String>,
}

impl PlanSummary {
    /// Summarizes `plan` for package `package`.
    #[must_use]
    pub fn new(package: &str, plan: &EmissionPlan) -> Self {
        Self {
            package: package.to_string(),
            instruction_count: plan.len(),
            instructions: plan.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Runs the plan command.
///
/// JSON output carries the full structured plan; text and pretty output
/// print one line per instruction.
///
/// # Errors
///
/// Returns an error if the configuration or a service specification is
/// invalid.
pub fn run(config: &ConfigArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let configuration = load_configuration(&config.config)?;
    let name = configuration.package_name();

    let plan = ClientGenerator::new()?
        .plan(&configuration)
        .with_context(|| format!("failed to plan client for '{name}'"))?;
    info!("Planned {} instructions for '{name}'", plan.len());

    let formatted = match output_format {
        OutputFormat::Json => crate::formatters::json::format(&plan)?,
        OutputFormat::Text | OutputFormat::Pretty => {
            crate::formatters::format_output(&PlanSummary::new(name, &plan), output_format)?
        }
    };
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}
