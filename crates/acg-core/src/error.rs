//! Error types for the API client generator.
//!
//! Every failure names the configuration fragment or template that caused
//! it, so a single message is enough to locate the problem.
//!
//! # Examples
//!
//! ```
//! use acg_core::{Error, Result};
//!
//! fn require_name(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "package name cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = require_name("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use thiserror::Error;

/// Main error type for the API client generator.
///
/// All library crates in the workspace report failures through this type.
/// None of the variants are retryable: generation is deterministic, so
/// rerunning without fixing the input reproduces the same error.
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration document could not be located.
    #[error("configuration file not found: {path}")]
    ConfigurationMissing {
        /// Path that was looked up
        path: String,
    },

    /// The configuration document exists but is not well-formed.
    #[error("failed to parse configuration file {path}: {message}")]
    ConfigurationParse {
        /// Path of the offending document
        path: String,
        /// Parser diagnostic
        message: String,
    },

    /// A configuration value is well-formed YAML but semantically invalid.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// A dotted service path violates the `segment(.segment)*` grammar.
    #[error("malformed service path '{path}': {reason}")]
    MalformedPath {
        /// The service path as written in the configuration
        path: String,
        /// Why the path was rejected
        reason: String,
    },

    /// An endpoint list item violates the `name:VERB` grammar.
    #[error("malformed endpoint '{endpoint}': {reason}")]
    MalformedEndpoint {
        /// The offending item (or whole list when the list itself is bad)
        endpoint: String,
        /// Why the item was rejected
        reason: String,
    },

    /// The same method name appears twice in one service's endpoint list.
    #[error("duplicate endpoint '{endpoint}' in service '{service}'")]
    DuplicateEndpoint {
        /// Service path owning the endpoint list
        service: String,
        /// Repeated method name
        endpoint: String,
    },

    /// Two distinct segments map to the same generated class name.
    #[error("segments '{first}' and '{second}' both map to class '{class}'")]
    ClassNameCollision {
        /// Generated class name
        class: String,
        /// Segment that claimed the name first
        first: String,
        /// Segment that collided with it
        second: String,
    },

    /// A rendering step referenced a template that does not exist.
    #[error("template not found: {template}")]
    TemplateNotFound {
        /// Template identifier, e.g. `client/class`
        template: String,
    },

    /// A template placeholder has no value in the substitution map.
    #[error("template '{template}' requires substitution '{placeholder}'")]
    MissingSubstitution {
        /// Template identifier
        template: String,
        /// Unresolved placeholder name
        placeholder: String,
    },

    /// A substitution was supplied that the template never references.
    #[error("template '{template}' has no placeholder '{key}'")]
    UnusedSubstitution {
        /// Template identifier
        template: String,
        /// Key that matched no placeholder
        key: String,
    },

    /// A template could not be compiled or rendered.
    #[error("template '{template}' is invalid: {message}")]
    TemplateSyntax {
        /// Template identifier
        template: String,
        /// Engine diagnostic
        message: String,
    },

    /// Filesystem or stream I/O failed.
    #[error("I/O error while {context}")]
    Io {
        /// What was being done when the failure happened
        context: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An external packaging command failed.
    #[error("publish step '{step}' failed: {status}")]
    PublishStepFailed {
        /// Command line of the failing step
        step: String,
        /// Exit status or spawn failure description
        status: String,
    },
}

impl Error {
    /// Returns `true` if the configuration document is missing or unparsable,
    /// or holds invalid values.
    ///
    /// # Examples
    ///
    /// ```
    /// use acg_core::Error;
    ///
    /// let err = Error::ConfigurationMissing {
    ///     path: ".acg.yml".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMissing { .. }
                | Self::ConfigurationParse { .. }
                | Self::ConfigError { .. }
        )
    }

    /// Returns `true` if a service path or endpoint list is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use acg_core::Error;
    ///
    /// let err = Error::MalformedPath {
    ///     path: "a..b".to_string(),
    ///     reason: "empty segment".to_string(),
    /// };
    /// assert!(err.is_spec_error());
    /// ```
    #[must_use]
    pub const fn is_spec_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedPath { .. }
                | Self::MalformedEndpoint { .. }
                | Self::DuplicateEndpoint { .. }
                | Self::ClassNameCollision { .. }
        )
    }

    /// Returns `true` if a template lookup or substitution failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use acg_core::Error;
    ///
    /// let err = Error::TemplateNotFound {
    ///     template: "client/missing".to_string(),
    /// };
    /// assert!(err.is_template_error());
    /// ```
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(
            self,
            Self::TemplateNotFound { .. }
                | Self::MissingSubstitution { .. }
                | Self::UnusedSubstitution { .. }
                | Self::TemplateSyntax { .. }
        )
    }

    /// Returns `true` if the failure came from user-supplied input
    /// (configuration or service specification) rather than the environment.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        self.is_config_error() || self.is_spec_error()
    }

    /// Wraps an I/O error with a short description of the failed action.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type alias used throughout the workspace.
///
/// # Examples
///
/// ```
/// use acg_core::{Error, Result};
///
/// fn non_negative(value: i32) -> Result<i32> {
///     if value < 0 {
///         return Err(Error::ConfigError {
///             message: "value must be non-negative".to_string(),
///         });
///     }
///     Ok(value)
/// }
///
/// assert!(non_negative(5).is_ok());
/// assert!(non_negative(-1).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
