//! Package skeleton around the generated client module.
//!
//! Paths are relative to the package root, which the caller places at
//! `<output>/<name>/`.

use crate::assembler::escape_single_quoted;
use crate::template_engine::{
    PACKAGE_INIT, PACKAGE_LICENSE, PACKAGE_REQUIREMENTS, PACKAGE_SETUP, Substitutions,
    TemplateEngine,
};
use crate::types::{GeneratedCode, GeneratedFile};
use acg_core::{Configuration, Result};

/// Package manifest file name.
pub const SETUP_FILE: &str = "setup.py";
/// License file name.
pub const LICENSE_FILE: &str = "LICENSE";
/// Dependency list file name.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
/// Package initializer file name.
pub const INIT_FILE: &str = "__init__.py";

/// Renders the files that turn a client module into an installable
/// package.
#[derive(Debug, Clone, Copy)]
pub struct PackageScaffolder<'e> {
    engine: &'e TemplateEngine,
}

impl<'e> PackageScaffolder<'e> {
    /// Creates a scaffolder borrowing `engine`.
    #[must_use]
    pub const fn new(engine: &'e TemplateEngine) -> Self {
        Self { engine }
    }

    /// Builds the full file set for `config`, embedding `client_source` as
    /// the package's client module.
    ///
    /// # Errors
    ///
    /// Returns a template error if any package template fails to render.
    pub fn scaffold(&self, config: &Configuration, client_source: &str) -> Result<GeneratedCode> {
        let name = config.package_name();
        let mut code = GeneratedCode::new();

        code.add_file(GeneratedFile::new(
            SETUP_FILE,
            self.engine.render_template(
                PACKAGE_SETUP,
                Some(
                    &Substitutions::new()
                        .with("author", escape_single_quoted(config.author()))
                        .with("package_name", name)
                        .with("version", escape_single_quoted(&config.generator.version)),
                ),
            )?,
        ));

        code.add_file(GeneratedFile::new(
            LICENSE_FILE,
            self.engine.render_template(
                PACKAGE_LICENSE,
                Some(&Substitutions::new().with("author", config.author())),
            )?,
        ));

        code.add_file(GeneratedFile::new(
            REQUIREMENTS_FILE,
            self.engine.render_template(PACKAGE_REQUIREMENTS, None)?,
        ));

        code.add_file(GeneratedFile::new(
            format!("{name}/{INIT_FILE}"),
            self.engine.render_template(
                PACKAGE_INIT,
                Some(
                    &Substitutions::new()
                        .with("package_name", name)
                        .with("api_client", config.client_object_name()),
                ),
            )?,
        ));

        code.add_file(GeneratedFile::new(
            format!("{name}/{}", config.module_file_name()),
            client_source,
        ));

        for file in code.files() {
            tracing::debug!("Scaffolded {}", file.path());
        }

        Ok(code)
    }
}
