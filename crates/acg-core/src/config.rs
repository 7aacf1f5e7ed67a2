//! Configuration document for the API client generator.
//!
//! The document is read and validated exactly once per run; every component
//! then receives the resulting [`Configuration`] by reference. Nothing
//! re-reads the file later.
//!
//! # Document layout
//!
//! ```yaml
//! pypi:
//!   username: alice
//!   password: s3cret
//! acg:
//!   api: https://api.example.com/
//!   name: demo
//!   version: 0.1.0
//!   services:
//!     users:
//!       url: users
//!       endpoints: "list:GET, create:POST"
//! ```
//!
//! # Examples
//!
//! ```
//! use acg_core::Configuration;
//!
//! let yaml = r#"
//! pypi:
//!   username: alice
//!   password: s3cret
//! acg:
//!   api: https://x/
//!   name: demo
//!   version: 0.1.0
//!   services:
//!     users:
//!       url: /users
//!       endpoints: "list:GET, create:POST"
//! "#;
//!
//! let config = Configuration::from_yaml_str(yaml, "inline").unwrap();
//! assert_eq!(config.package_name(), "demo");
//! assert_eq!(config.client_object_name(), "demo_client");
//! assert_eq!(config.generator.services.len(), 1);
//! ```

use crate::identifier::is_usable_name;
use crate::{Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".acg.yml";

/// Fully parsed configuration document.
#[derive(Debug)]
pub struct Configuration {
    /// Package registry credentials (`pypi` section).
    pub registry: RegistryCredentials,
    /// Generator settings (`acg` section).
    pub generator: GeneratorSettings,
}

/// Credentials used for the package author field and for uploads.
///
/// The password is kept as a [`SecretString`] so it never shows up in
/// `Debug` output or logs.
#[derive(Debug, Deserialize)]
pub struct RegistryCredentials {
    /// Registry account name, also used as the package author.
    pub username: String,
    #[serde(deserialize_with = "deserialize_secret")]
    password: SecretString,
}

impl RegistryCredentials {
    /// Creates credentials from plain values.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Returns the registry password.
    #[must_use]
    pub const fn password(&self) -> &SecretString {
        &self.password
    }
}

/// The `acg` section: what to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Base API URL every service URL is appended to.
    pub api: String,
    /// Package name; also names the client module and singleton.
    pub name: String,
    /// Package version written into the package manifest.
    pub version: String,
    /// Services in the order they were declared in the document.
    pub services: Vec<ServiceEntry>,
}

/// One entry of the `services` mapping, still in raw textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Dotted service path, the mapping key.
    pub path: String,
    /// URL fragment appended to the base API URL.
    pub url: String,
    /// Endpoint list in `name:VERB, name:VERB` form.
    pub endpoints: String,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    pypi: RegistryCredentials,
    acg: RawSettings,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    api: String,
    name: String,
    #[serde(deserialize_with = "deserialize_scalar")]
    version: String,
    #[serde(default)]
    services: serde_yaml::Mapping,
}

#[derive(Debug, Deserialize)]
struct RawService {
    url: String,
    endpoints: String,
}

impl Configuration {
    /// Loads and validates the configuration document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist ([`Error::ConfigurationMissing`])
    /// - The file cannot be read ([`Error::Io`])
    /// - The document is not valid YAML or lacks required fields
    ///   ([`Error::ConfigurationParse`])
    /// - A value is semantically invalid ([`Error::ConfigError`])
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();

        if !path.is_file() {
            return Err(Error::ConfigurationMissing { path: label });
        }

        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading configuration {label}"), e))?;

        let config = Self::from_yaml_str(&text, &label)?;
        tracing::info!(
            "Loaded configuration from {label}: package '{}' with {} services",
            config.generator.name,
            config.generator.services.len()
        );
        Ok(config)
    }

    /// Parses and validates a configuration document held in memory.
    ///
    /// `source` is only used to label error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationParse`] for malformed documents and
    /// [`Error::ConfigError`] for invalid values.
    pub fn from_yaml_str(text: &str, source: &str) -> Result<Self> {
        let raw: RawDocument =
            serde_yaml::from_str(text).map_err(|e| Error::ConfigurationParse {
                path: source.to_string(),
                message: e.to_string(),
            })?;

        let mut services = Vec::with_capacity(raw.acg.services.len());
        for (key, value) in raw.acg.services {
            let path = match key {
                serde_yaml::Value::String(path) => path,
                other => {
                    return Err(Error::ConfigError {
                        message: format!("service keys must be strings, found {other:?}"),
                    });
                }
            };

            let service: RawService =
                serde_yaml::from_value(value).map_err(|e| Error::ConfigurationParse {
                    path: source.to_string(),
                    message: format!("service '{path}': {e}"),
                })?;

            services.push(ServiceEntry {
                path,
                url: service.url,
                endpoints: service.endpoints,
            });
        }

        let generator = GeneratorSettings {
            api: raw.acg.api,
            name: raw.acg.name,
            version: raw.acg.version,
            services,
        };
        validate_package_name(&generator.name)?;

        Ok(Self {
            registry: raw.pypi,
            generator,
        })
    }

    /// Package name from the `acg.name` field.
    #[must_use]
    pub fn package_name(&self) -> &str {
        &self.generator.name
    }

    /// File name of the generated client module, e.g. `demo.py`.
    #[must_use]
    pub fn module_file_name(&self) -> String {
        format!("{}.py", self.generator.name)
    }

    /// Name of the generated singleton, e.g. `demo_client`.
    #[must_use]
    pub fn client_object_name(&self) -> String {
        format!("{}_client", self.generator.name)
    }

    /// Package author, taken from the registry username.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.registry.username
    }
}

/// The package name becomes a directory, a module, and part of an
/// identifier in the generated source.
fn validate_package_name(name: &str) -> Result<()> {
    if is_usable_name(name) {
        Ok(())
    } else {
        Err(Error::ConfigError {
            message: format!(
                "package name '{name}' must be an identifier (letters, digits, '_') \
                 and not a Python keyword"
            ),
        })
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Accepts `version: 1.2` (a YAML float) as well as `version: "1.2.0"`.
fn deserialize_scalar<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(<D::Error as serde::de::Error>::custom(format!(
            "expected a string or number, found {other:?}"
        ))),
    }
}
