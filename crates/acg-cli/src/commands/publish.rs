//! Publish command implementation.
//!
//! Builds distributions for an already generated package and uploads them.

use super::common::{build_engine, load_configuration, package_dir};
use crate::cli::{ConfigArgs, OutputArgs};
use crate::publish::{CommandRunner, PublishPipeline, PublishReport, SystemRunner, default_pypirc_path};
use acg_codegen::TemplateEngine;
use acg_core::Configuration;
use acg_core::cli::{ExitCode, OutputFormat};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Publishes the package generated for `config` under `output`.
///
/// With `dry_run` the steps are only reported.
///
/// # Errors
///
/// Returns an error if the package is missing, credentials cannot be
/// written, or a step fails.
pub fn publish_package<R: CommandRunner>(
    config: &Configuration,
    engine: &TemplateEngine,
    runner: R,
    output: &Path,
    pypirc: &Path,
    dry_run: bool,
) -> Result<PublishReport> {
    let dir = package_dir(output, config.package_name())?;
    let pipeline = PublishPipeline::new(runner, engine, &dir, pypirc);

    if dry_run {
        info!("Dry run: nothing will be executed");
        return Ok(pipeline.dry_run());
    }

    pipeline
        .run(&config.registry)
        .with_context(|| format!("failed to publish {}", dir.display()))
}

/// Runs the publish command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or publishing fails.
pub fn run(
    config: &ConfigArgs,
    output: &OutputArgs,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let configuration = load_configuration(&config.config)?;
    let engine = build_engine(output.templates.as_deref())?;
    let pypirc = default_pypirc_path()?;

    let report = publish_package(
        &configuration,
        &engine,
        SystemRunner,
        &output.output,
        &pypirc,
        dry_run,
    )?;

    let formatted = crate::formatters::format_output(&report, output_format)?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::super::common::test_support::write_config;
    use super::*;
    use crate::publish::MockCommandRunner;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_publish_package_dry_run() {
        let temp = TempDir::new().unwrap();
        let config = load_configuration(&write_config(temp.path())).unwrap();
        let engine = TemplateEngine::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let pypirc = temp.path().join(".pypirc");
        let report =
            publish_package(&config, &engine, runner, temp.path(), &pypirc, true).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.steps.len(), 4);
        assert!(report.package_dir.ends_with("demo"));
        assert!(!pypirc.exists());
    }

    #[test]
    fn test_publish_package_without_generated_package() {
        let temp = TempDir::new().unwrap();
        let config = load_configuration(&write_config(temp.path())).unwrap();
        let engine = TemplateEngine::new().unwrap();
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let err = publish_package(
            &config,
            &engine,
            runner,
            temp.path(),
            &temp.path().join(".pypirc"),
            false,
        )
        .unwrap_err();

        assert!(err.to_string().contains("failed to publish"));
        assert_eq!(crate::runner::exit_code_for(&err), ExitCode::ERROR);
    }

    #[test]
    fn test_publish_package_uses_pypirc_override() {
        let temp = TempDir::new().unwrap();
        let config = load_configuration(&write_config(temp.path())).unwrap();

        let templates = temp.path().join("templates");
        fs::create_dir_all(templates.join("pypi")).unwrap();
        fs::write(
            templates.join("pypi/pypirc.hbs"),
            "[pypi]\nrepository: https://test.pypi.org/legacy/\nusername: {{username}}\npassword: {{password}}\n",
        )
        .unwrap();
        let engine = build_engine(Some(&templates)).unwrap();

        let dir = temp.path().join("demo");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("setup.py"), "setup()").unwrap();
        let dist = dir.join("dist");

        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(4).returning(move |step, _| {
            if step.args.first().map(String::as_str) == Some("setup.py") {
                fs::create_dir_all(&dist).unwrap();
                fs::write(dist.join("demo-0.1.0.tar.gz"), "").unwrap();
            }
            Ok(Some(0))
        });

        let pypirc = temp.path().join(".pypirc");
        publish_package(&config, &engine, runner, temp.path(), &pypirc, false).unwrap();

        let written = fs::read_to_string(&pypirc).unwrap();
        assert!(written.contains("repository: https://test.pypi.org/legacy/"));
        assert!(written.contains("username: alice"));
    }

    #[test]
    fn test_run_rejects_missing_template_dir() {
        let temp = TempDir::new().unwrap();
        let config = ConfigArgs {
            config: write_config(temp.path()),
        };
        let output = OutputArgs {
            output: temp.path().to_path_buf(),
            templates: Some(temp.path().join("missing")),
        };

        let err = run(&config, &output, true, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("failed to load templates"));
    }
}
