//! Common utilities shared across CLI commands.

use acg_codegen::TemplateEngine;
use acg_core::Configuration;
use acg_files::expand_tilde;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads and validates the configuration document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation. The
/// generator error stays in the chain for exit-code mapping.
pub fn load_configuration(path: &Path) -> Result<Configuration> {
    debug!("Loading configuration from {}", path.display());
    Configuration::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

/// Creates the template engine, applying overrides from `templates` when
/// given.
///
/// # Errors
///
/// Returns an error if the override directory is missing or one of its
/// templates does not parse.
pub fn build_engine(templates: Option<&Path>) -> Result<TemplateEngine> {
    let Some(dir) = templates else {
        return Ok(TemplateEngine::new()?);
    };

    let dir = expand_tilde(dir)?;
    debug!("Using template overrides from {}", dir.display());
    TemplateEngine::with_overrides(&dir)
        .with_context(|| format!("failed to load templates from {}", dir.display()))
}

/// Directory a package named `name` lives in under `output`.
///
/// # Errors
///
/// Returns an error if `output` starts with `~` and the home directory
/// cannot be determined.
pub fn package_dir(output: &Path, name: &str) -> Result<PathBuf> {
    Ok(expand_tilde(output)?.join(name))
}
