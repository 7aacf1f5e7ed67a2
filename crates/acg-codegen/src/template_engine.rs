//! Template engine for code generation using Handlebars.
//!
//! Templates are plain text with `{{name}}` placeholders. Every template's
//! placeholders are enumerated when it is registered, and rendering fails
//! closed: a placeholder without a value, or a value without a placeholder,
//! is an error naming the template and the key.
//!
//! # Examples
//!
//! ```
//! use acg_codegen::template_engine::{Substitutions, TemplateEngine, CLASS};
//!
//! let engine = TemplateEngine::new().unwrap();
//! let template = engine.load(CLASS).unwrap();
//! assert_eq!(template.placeholders(), ["class"]);
//!
//! let source = engine
//!     .render(&template, Some(&Substitutions::new().with("class", "Users")))
//!     .unwrap();
//! assert!(source.starts_with("class Users(object):"));
//! ```

use acg_core::{Error, Result};
use handlebars::Handlebars;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Header of the generated client module.
pub const IMPORTS: &str = "client/imports";
/// Class definition (`class`).
pub const CLASS: &str = "client/class";
/// Attribute link between classes (`class`, `property`, `class_second`).
pub const PROPERTY: &str = "client/property";
/// Request method (`class`, `endpoint`, `http_method`, `url`).
pub const REQUEST: &str = "client/request";
/// Singleton assignment (`api_object`, `api_class`).
pub const API_CLIENT: &str = "client/api_client";
/// Package initializer (`package_name`, `api_client`).
pub const PACKAGE_INIT: &str = "package/init";
/// Package manifest (`author`, `package_name`, `version`).
pub const PACKAGE_SETUP: &str = "package/setup";
/// License text (`author`).
pub const PACKAGE_LICENSE: &str = "package/license";
/// Dependency list (no placeholders).
pub const PACKAGE_REQUIREMENTS: &str = "package/requirements";
/// Registry credentials file (`username`, `password`).
pub const PYPIRC: &str = "pypi/pypirc";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (IMPORTS, include_str!("../templates/client/imports.py.hbs")),
    (CLASS, include_str!("../templates/client/class.py.hbs")),
    (PROPERTY, include_str!("../templates/client/property.py.hbs")),
    (REQUEST, include_str!("../templates/client/request.py.hbs")),
    (API_CLIENT, include_str!("../templates/client/api_client.py.hbs")),
    (PACKAGE_INIT, include_str!("../templates/package/init.py.hbs")),
    (PACKAGE_SETUP, include_str!("../templates/package/setup.py.hbs")),
    (PACKAGE_LICENSE, include_str!("../templates/package/license.txt.hbs")),
    (
        PACKAGE_REQUIREMENTS,
        include_str!("../templates/package/requirements.txt.hbs"),
    ),
    (PYPIRC, include_str!("../templates/pypi/pypirc.hbs")),
];

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex")
});

/// Key→value map supplied to a template.
///
/// # Examples
///
/// ```
/// use acg_codegen::template_engine::Substitutions;
///
/// let subs = Substitutions::new()
///     .with("class", "Users")
///     .with("property", "profile");
/// assert_eq!(subs.get("class"), Some("Users"));
/// assert_eq!(subs.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Substitutions(BTreeMap<String, String>);

impl Substitutions {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no values were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug)]
struct StoredTemplate {
    text: String,
    placeholders: Vec<String>,
}

/// A loaded template, borrowed from the engine that owns it.
#[derive(Debug, Clone, Copy)]
pub struct TemplateHandle<'e> {
    id: &'e str,
    template: &'e StoredTemplate,
}

impl<'e> TemplateHandle<'e> {
    /// Template identifier, e.g. `client/class`.
    #[must_use]
    pub const fn id(&self) -> &'e str {
        self.id
    }

    /// Raw template text.
    #[must_use]
    pub fn text(&self) -> &'e str {
        &self.template.text
    }

    /// Distinct placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> &'e [String] {
        &self.template.placeholders
    }

    /// Returns `true` if the template references `name`.
    #[must_use]
    pub fn requires(&self, name: &str) -> bool {
        self.template.placeholders.iter().any(|p| p == name)
    }
}

/// Template engine for code generation.
///
/// Wraps Handlebars in strict mode with HTML escaping disabled, since the
/// output is source code rather than markup.
#[derive(Debug)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    templates: HashMap<String, StoredTemplate>,
}

impl TemplateEngine {
    /// Creates an engine with the built-in templates registered.
    ///
    /// # Errors
    ///
    /// Returns error if template registration fails (should not happen
    /// with valid built-in templates).
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut engine = Self {
            handlebars,
            templates: HashMap::new(),
        };

        for (id, text) in BUILTIN_TEMPLATES {
            engine.register_template_string(id, text)?;
        }

        Ok(engine)
    }

    /// Creates an engine whose built-ins may be replaced by files in `dir`.
    ///
    /// A template `client/class` is overridden by `<dir>/client/class.hbs`
    /// when that file exists; missing files keep the built-in version.
    ///
    /// # Errors
    ///
    /// Returns error if `dir` is not a directory, an override cannot be
    /// read, or an override is not a valid template.
    pub fn with_overrides(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::TemplateNotFound {
                template: dir.display().to_string(),
            });
        }

        let mut engine = Self::new()?;
        for (id, _) in BUILTIN_TEMPLATES {
            let path = dir.join(format!("{id}.hbs"));
            if !path.is_file() {
                continue;
            }

            let text = fs::read_to_string(&path)
                .map_err(|e| Error::io(format!("reading template {}", path.display()), e))?;
            engine.register_template_string(id, &text)?;
            tracing::info!("Using template override {}", path.display());
        }

        Ok(engine)
    }

    /// Registers (or replaces) a template.
    ///
    /// Only plain `{{name}}` placeholders are accepted; block helpers,
    /// partials, and comments are rejected so the set of required keys is
    /// always known up front.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateSyntax`] if the text uses anything other
    /// than plain placeholders or Handlebars cannot compile it.
    pub fn register_template_string(&mut self, id: &str, text: &str) -> Result<()> {
        let placeholders = scan_placeholders(id, text)?;

        self.handlebars
            .register_template_string(id, text)
            .map_err(|e| Error::TemplateSyntax {
                template: id.to_string(),
                message: e.to_string(),
            })?;

        self.templates.insert(
            id.to_string(),
            StoredTemplate {
                text: text.to_string(),
                placeholders,
            },
        );
        Ok(())
    }

    /// Resolves a template by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateNotFound`] if no template has that id.
    pub fn load(&self, id: &str) -> Result<TemplateHandle<'_>> {
        self.templates
            .get_key_value(id)
            .map(|(id, template)| TemplateHandle { id, template })
            .ok_or_else(|| Error::TemplateNotFound {
                template: id.to_string(),
            })
    }

    /// Renders a loaded template.
    ///
    /// With `None`, the template text is returned unchanged, which is only
    /// allowed for templates without placeholders.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`Error::MissingSubstitution`] for the first placeholder without a
    ///   value
    /// - [`Error::UnusedSubstitution`] for a key the template never uses
    /// - [`Error::TemplateSyntax`] if Handlebars fails to render
    pub fn render(
        &self,
        template: &TemplateHandle<'_>,
        substitutions: Option<&Substitutions>,
    ) -> Result<String> {
        let Some(substitutions) = substitutions else {
            if let Some(placeholder) = template.placeholders().first() {
                return Err(Error::MissingSubstitution {
                    template: template.id().to_string(),
                    placeholder: placeholder.clone(),
                });
            }
            return Ok(template.text().to_string());
        };

        if let Some(placeholder) = template
            .placeholders()
            .iter()
            .find(|p| substitutions.get(p).is_none())
        {
            return Err(Error::MissingSubstitution {
                template: template.id().to_string(),
                placeholder: placeholder.clone(),
            });
        }

        if let Some(key) = substitutions.keys().find(|k| !template.requires(k)) {
            return Err(Error::UnusedSubstitution {
                template: template.id().to_string(),
                key: key.to_string(),
            });
        }

        self.handlebars
            .render(template.id(), substitutions)
            .map_err(|e| Error::TemplateSyntax {
                template: template.id().to_string(),
                message: format!("Template rendering failed: {e}"),
            })
    }

    /// Loads and renders in one step.
    ///
    /// # Errors
    ///
    /// See [`TemplateEngine::load`] and [`TemplateEngine::render`].
    pub fn render_template(&self, id: &str, substitutions: Option<&Substitutions>) -> Result<String> {
        let template = self.load(id)?;
        self.render(&template, substitutions)
    }

    /// Ids of all registered templates, sorted.
    #[must_use]
    pub fn template_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

/// Collects placeholder names in order of first appearance and rejects any
/// `{{` that does not open a plain placeholder.
fn scan_placeholders(id: &str, text: &str) -> Result<Vec<String>> {
    let mut placeholders: Vec<String> = Vec::new();
    let mut plain = 0;

    for capture in PLACEHOLDER_REGEX.captures_iter(text) {
        plain += 1;
        let name = &capture[1];
        if !placeholders.iter().any(|p| p == name) {
            placeholders.push(name.to_string());
        }
    }

    if text.matches("{{").count() != plain {
        return Err(Error::TemplateSyntax {
            template: id.to_string(),
            message: "only plain {{name}} placeholders are supported".to_string(),
        });
    }

    Ok(placeholders)
}
