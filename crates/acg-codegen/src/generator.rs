//! End-to-end generation from a [`Configuration`].
//!
//! # Examples
//!
//! ```
//! use acg_codegen::ClientGenerator;
//! use acg_core::Configuration;
//!
//! let yaml = r#"
//! pypi: {username: alice, password: s3cret}
//! acg:
//!   api: https://x/
//!   name: demo
//!   version: 0.1.0
//!   services:
//!     users: {url: /users, endpoints: "list:GET, create:POST"}
//! "#;
//! let config = Configuration::from_yaml_str(yaml, "inline").unwrap();
//!
//! let generator = ClientGenerator::new().unwrap();
//! let package = generator.generate(&config).unwrap();
//!
//! assert_eq!(package.code.file_count(), 5);
//! assert!(package.client_source().unwrap().contains("demo_client = Demo_client()"));
//! ```

use crate::assembler::CodeAssembler;
use crate::package::PackageScaffolder;
use crate::plan::{ClassHierarchyBuilder, EmissionPlan};
use crate::spec::ServiceSpec;
use crate::template_engine::TemplateEngine;
use crate::types::GeneratedCode;
use acg_core::{Configuration, Result};
use serde::Serialize;

/// Everything produced by one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPackage {
    /// Plan the client module was assembled from
    pub plan: EmissionPlan,
    /// Package files, relative to the package root
    pub code: GeneratedCode,
    /// Relative path of the client module within `code`
    pub client_path: String,
}

impl GeneratedPackage {
    /// Source of the client module.
    #[must_use]
    pub fn client_source(&self) -> Option<&str> {
        self.code.get(&self.client_path).map(|f| f.content())
    }
}

/// Runs parse, plan, assemble, and scaffold for a configuration.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`; a run holds no state between calls.
#[derive(Debug)]
pub struct ClientGenerator {
    engine: TemplateEngine,
}

impl ClientGenerator {
    /// Creates a generator with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns error if template registration fails (should not happen
    /// with valid built-in templates).
    pub fn new() -> Result<Self> {
        Ok(Self::with_engine(TemplateEngine::new()?))
    }

    /// Creates a generator rendering through `engine`.
    #[must_use]
    pub const fn with_engine(engine: TemplateEngine) -> Self {
        Self { engine }
    }

    /// Template engine used for rendering.
    #[must_use]
    pub const fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    /// Parses the configured services and builds the emission plan.
    ///
    /// # Errors
    ///
    /// Returns a spec error for malformed services, duplicate endpoints, or
    /// colliding class names.
    pub fn plan(&self, config: &Configuration) -> Result<EmissionPlan> {
        let specs = ServiceSpec::parse_all(&config.generator.services)?;
        ClassHierarchyBuilder::new(&config.generator.api, config.package_name()).build(&specs)
    }

    /// Generates the client module source only.
    ///
    /// # Errors
    ///
    /// See [`ClientGenerator::plan`]; also fails on template errors.
    pub fn generate_client(&self, config: &Configuration) -> Result<String> {
        let plan = self.plan(config)?;
        CodeAssembler::new(&self.engine).assemble_to_string(&plan)
    }

    /// Generates the client module and the package around it.
    ///
    /// # Errors
    ///
    /// See [`ClientGenerator::plan`]; also fails on template errors.
    pub fn generate(&self, config: &Configuration) -> Result<GeneratedPackage> {
        tracing::info!(
            "Generating client package '{}' from {} services",
            config.package_name(),
            config.generator.services.len()
        );

        let plan = self.plan(config)?;
        let source = CodeAssembler::new(&self.engine).assemble_to_string(&plan)?;
        let code = PackageScaffolder::new(&self.engine).scaffold(config, &source)?;

        tracing::info!(
            "Generated {} files ({} instructions) for '{}'",
            code.file_count(),
            plan.len(),
            config.package_name()
        );

        Ok(GeneratedPackage {
            plan,
            code,
            client_path: format!("{}/{}", config.package_name(), config.module_file_name()),
        })
    }
}
