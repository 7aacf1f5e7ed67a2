//! Parsing of the service notation used in the configuration document.
//!
//! Two small grammars are handled here:
//! - service paths: `segment(.segment)*`, e.g. `users.profile`
//! - endpoint lists: `name:VERB(, name:VERB)*`, e.g. `list:GET, create:POST`
//!
//! # Examples
//!
//! ```
//! use acg_codegen::spec::{parse_endpoints, parse_service};
//!
//! assert_eq!(parse_service("a.b.c").unwrap(), vec!["a", "b", "c"]);
//!
//! let endpoints = parse_endpoints("get_all:GET, create:POST").unwrap();
//! assert_eq!(endpoints.get("get_all"), Some("GET"));
//! assert_eq!(endpoints.get("create"), Some("POST"));
//! ```

use crate::naming::class_name;
use acg_core::identifier::{is_identifier, is_keyword};
use acg_core::{Error, Result, ServiceEntry};
use serde::Serialize;

/// Separator between items of an endpoint list.
pub const ENDPOINT_SEPARATOR: &str = ", ";

/// Separator between a method name and its verb.
pub const VERB_SEPARATOR: char = ':';

/// Splits a dotted service path into its segments.
///
/// # Errors
///
/// Returns [`Error::MalformedPath`] if the path is empty, contains an empty
/// segment (`a..b`, `.a`, `a.`), a segment that is not an identifier, or
/// a segment that is (or capitalizes to) a Python keyword.
pub fn parse_service(path: &str) -> Result<Vec<String>> {
    let malformed = |reason: String| Error::MalformedPath {
        path: path.to_string(),
        reason,
    };

    if path.is_empty() {
        return Err(malformed("path is empty".to_string()));
    }

    path.split('.')
        .map(|segment| {
            if segment.is_empty() {
                Err(malformed("path contains an empty segment".to_string()))
            } else if !is_identifier(segment) {
                Err(malformed(format!(
                    "segment '{segment}' is not a valid identifier"
                )))
            } else if is_keyword(segment) || is_keyword(&class_name(segment)) {
                Err(malformed(format!(
                    "segment '{segment}' collides with a Python keyword"
                )))
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}

/// Parses an endpoint list into a name→verb mapping.
///
/// Verbs are opaque: whatever follows the `:` is copied verbatim (after
/// trimming surrounding whitespace).
///
/// # Errors
///
/// Returns:
/// - [`Error::MalformedEndpoint`] if an item does not contain exactly one
///   `:`, has an empty name or verb, or the name is not an identifier or
///   is a Python keyword
/// - [`Error::DuplicateEndpoint`] if a method name repeats; the `service`
///   field is left empty here and filled in by [`ServiceSpec::from_entry`]
pub fn parse_endpoints(text: &str) -> Result<EndpointMap> {
    let mut map = EndpointMap::default();

    for item in text.split(ENDPOINT_SEPARATOR) {
        let malformed = |reason: &str| Error::MalformedEndpoint {
            endpoint: item.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = item.split(VERB_SEPARATOR).collect();
        let [name, verb] = parts.as_slice() else {
            return Err(malformed("expected exactly one ':' between name and verb"));
        };

        let (name, verb) = (name.trim(), verb.trim());
        if name.is_empty() {
            return Err(malformed("method name is empty"));
        }
        if verb.is_empty() {
            return Err(malformed("verb is empty"));
        }
        if !is_identifier(name) {
            return Err(malformed("method name is not a valid identifier"));
        }
        if is_keyword(name) {
            return Err(malformed("method name is a Python keyword"));
        }

        if map.get(name).is_some() {
            return Err(Error::DuplicateEndpoint {
                service: String::new(),
                endpoint: name.to_string(),
            });
        }

        map.entries.push(Endpoint {
            name: name.to_string(),
            verb: verb.to_string(),
        });
    }

    Ok(map)
}

/// A named operation bound to a transport verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Generated method name.
    pub name: String,
    /// Transport verb, copied verbatim into the output.
    pub verb: String,
}

/// Endpoint mapping with unique names, iterated in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EndpointMap {
    entries: Vec<Endpoint>,
}

impl EndpointMap {
    /// Looks up the verb bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.verb.as_str())
    }

    /// Iterates endpoints in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.entries.iter()
    }

    /// Number of endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no endpoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed service: its path segments, URL fragment, and endpoints.
///
/// Always has at least one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSpec {
    path: String,
    segments: Vec<String>,
    url: String,
    endpoints: EndpointMap,
}

impl ServiceSpec {
    /// Parses one raw `services` entry.
    ///
    /// # Errors
    ///
    /// Propagates path and endpoint parsing errors, with duplicate endpoint
    /// errors attributed to this service.
    pub fn from_entry(entry: &ServiceEntry) -> Result<Self> {
        let segments = parse_service(&entry.path)?;
        let endpoints = parse_endpoints(&entry.endpoints).map_err(|e| match e {
            Error::DuplicateEndpoint { endpoint, .. } => Error::DuplicateEndpoint {
                service: entry.path.clone(),
                endpoint,
            },
            other => other,
        })?;

        Ok(Self {
            path: entry.path.clone(),
            segments,
            url: entry.url.clone(),
            endpoints,
        })
    }

    /// Parses every entry, keeping declaration order.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed entry.
    pub fn parse_all(entries: &[ServiceEntry]) -> Result<Vec<Self>> {
        entries.iter().map(Self::from_entry).collect()
    }

    /// Dotted path as written in the configuration.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// First segment, attached to the root client.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// Last segment, which owns the endpoints.
    #[must_use]
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// URL fragment appended to the base API URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Endpoints bound to the leaf segment.
    #[must_use]
    pub const fn endpoints(&self) -> &EndpointMap {
        &self.endpoints
    }
}
