//! Core types for the package tree.
//!
//! # Examples
//!
//! ```
//! use acg_files::{FileEntry, FilePath};
//!
//! let path = FilePath::new("/demo/setup.py").unwrap();
//! let file = FileEntry::new("from setuptools import setup\n");
//!
//! assert_eq!(path.as_str(), "/demo/setup.py");
//! assert_eq!(path.relative(), "demo/setup.py");
//! assert_eq!(file.size(), 29);
//! ```

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while building or exporting a package tree.
///
/// # Examples
///
/// ```
/// use acg_files::FilesError;
///
/// let error = FilesError::FileNotFound {
///     path: "/demo/setup.py".to_string(),
/// };
///
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug)]
pub enum FilesError {
    /// File or directory not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// Path is invalid or malformed
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// The invalid path
        path: String,
    },

    /// Path is not absolute (must start with '/')
    #[error("Path must be absolute: {path}")]
    PathNotAbsolute {
        /// The relative path
        path: String,
    },

    /// Path contains invalid components (e.g., '..')
    #[error("Path contains invalid components: {path}")]
    InvalidPathComponent {
        /// The path with invalid components
        path: String,
    },

    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    IoError {
        /// Path being read or written
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl FilesError {
    /// Returns `true` if this is a file not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound { .. })
    }

    /// Returns `true` if this is an invalid path error.
    ///
    /// # Examples
    ///
    /// ```
    /// use acg_files::FilesError;
    ///
    /// let error = FilesError::InvalidPathComponent {
    ///     path: "/../escape".to_string(),
    /// };
    ///
    /// assert!(error.is_invalid_path());
    /// ```
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. }
                | Self::PathNotAbsolute { .. }
                | Self::InvalidPathComponent { .. }
        )
    }

    /// Returns `true` if this is an I/O error.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::IoError { .. })
    }
}

/// A validated path inside the package tree.
///
/// Always Unix-style: starts with '/', uses forward slashes, and never
/// contains '..' or empty segments.
///
/// # Examples
///
/// ```
/// use acg_files::FilePath;
///
/// assert!(FilePath::new("/demo/demo/__init__.py").is_ok());
/// assert!(FilePath::new("demo/setup.py").is_err());
/// assert!(FilePath::new("/demo/../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilePath(String);

impl FilePath {
    /// Validates and wraps a path.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::PathNotAbsolute` if the path does not start with
    /// '/', `FilesError::InvalidPathComponent` if it contains '..' or an
    /// empty segment, and `FilesError::InvalidPath` if it is empty or not
    /// UTF-8.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.to_str().ok_or_else(|| FilesError::InvalidPath {
            path: path.display().to_string(),
        })?;

        let normalized = if cfg!(target_os = "windows") {
            path_str.replace(std::path::MAIN_SEPARATOR, "/")
        } else {
            path_str.to_string()
        };

        if normalized.is_empty() {
            return Err(FilesError::InvalidPath {
                path: String::new(),
            });
        }

        let Some(rest) = normalized.strip_prefix('/') else {
            return Err(FilesError::PathNotAbsolute { path: normalized });
        };

        if rest.split('/').any(|segment| segment.is_empty() || segment == "..") {
            return Err(FilesError::InvalidPathComponent { path: normalized });
        }

        Ok(Self(normalized))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path without its leading '/'.
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.0[1..]
    }

    /// Returns the final component.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<Path> for FilePath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Content of one file in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    content: String,
}

impl FileEntry {
    /// Creates a file with the given content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Returns the file content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the content size in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.content.len()
    }
}

/// Type alias for file operation results.
pub type Result<T> = std::result::Result<T, FilesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_new_valid() {
        let path = FilePath::new("/demo/demo/demo.py").unwrap();
        assert_eq!(path.as_str(), "/demo/demo/demo.py");
        assert_eq!(path.relative(), "demo/demo/demo.py");
        assert_eq!(path.file_name(), "demo.py");
    }

    #[test]
    fn test_file_path_relative_fails() {
        let err = FilePath::new("demo/setup.py").unwrap_err();
        assert!(matches!(err, FilesError::PathNotAbsolute { .. }));
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_file_path_parent_dir_fails() {
        let err = FilePath::new("/demo/../escape").unwrap_err();
        assert!(matches!(err, FilesError::InvalidPathComponent { .. }));
    }

    #[test]
    fn test_file_path_empty_segments_fail() {
        assert!(FilePath::new("").is_err());
        assert!(FilePath::new("/").is_err());
        assert!(FilePath::new("/demo//setup.py").is_err());
        assert!(FilePath::new("/demo/").is_err());
    }

    #[test]
    fn test_file_path_allows_dots_in_names() {
        assert!(FilePath::new("/demo/.pypirc").is_ok());
        assert!(FilePath::new("/demo/a..b.txt").is_ok());
    }

    #[test]
    fn test_file_path_ordering_and_display() {
        let a = FilePath::new("/a.py").unwrap();
        let b = FilePath::new("/b.py").unwrap();
        assert!(a < b);
        assert_eq!(format!("{a}"), "/a.py");
    }

    #[test]
    fn test_file_entry() {
        let file = FileEntry::new("requests\n");
        assert_eq!(file.content(), "requests\n");
        assert_eq!(file.size(), 9);
    }

    #[test]
    fn test_files_error_predicates() {
        let not_found = FilesError::FileNotFound {
            path: "/x".to_string(),
        };
        assert!(not_found.is_not_found());
        assert!(!not_found.is_invalid_path());

        let io = FilesError::IoError {
            path: "/x".to_string(),
            source: std::io::Error::other("boom"),
        };
        assert!(io.is_io_error());
        assert!(io.to_string().contains("boom"));
    }
}
