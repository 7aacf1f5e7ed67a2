//! Builder for package trees.
//!
//! # Examples
//!
//! ```
//! use acg_files::FilesBuilder;
//!
//! let tree = FilesBuilder::new()
//!     .add_file("/demo/setup.py", "setup()")
//!     .add_file("/demo/requirements.txt", "requests\n")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(tree.file_count(), 2);
//! ```

use crate::tree::FileTree;
use crate::types::{FilesError, Result};
use acg_codegen::GeneratedCode;
use std::fs;
use std::path::{Path, PathBuf};

/// Fluent builder for a [`FileTree`].
///
/// Path errors are collected while adding files and reported by
/// [`FilesBuilder::build`], so a chain of `add_file` calls never needs
/// intermediate `?`.
///
/// # Examples
///
/// ```
/// use acg_files::FilesBuilder;
/// use acg_codegen::{GeneratedCode, GeneratedFile};
///
/// let mut code = GeneratedCode::new();
/// code.add_file(GeneratedFile::new("setup.py", "setup()"));
/// code.add_file(GeneratedFile::new("demo/demo.py", "import requests"));
///
/// let tree = FilesBuilder::from_generated_code(code, "/demo")
///     .build()
///     .unwrap();
///
/// assert!(tree.exists("/demo/setup.py"));
/// assert!(tree.exists("/demo/demo/demo.py"));
/// ```
#[derive(Debug, Default)]
pub struct FilesBuilder {
    tree: FileTree,
    errors: Vec<FilesError>,
}

impl FilesBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder holding every generated file under `base_path`.
    ///
    /// `base_path` is a tree path such as `/demo`; generated paths are
    /// relative and joined with forward slashes on every platform.
    #[must_use]
    pub fn from_generated_code(code: GeneratedCode, base_path: impl AsRef<Path>) -> Self {
        let base = base_path.as_ref().to_string_lossy();
        let base = base.trim_end_matches('/');

        code.files.into_iter().fold(Self::new(), |builder, file| {
            builder.add_file(format!("{base}/{}", file.path), file.content)
        })
    }

    /// Adds a file. An invalid path is reported by `build()`.
    #[must_use]
    pub fn add_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        if let Err(e) = self.tree.add_file(path, content) {
            self.errors.push(e);
        }
        self
    }

    /// Consumes the builder and returns the tree.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while adding files.
    ///
    /// ```
    /// use acg_files::FilesBuilder;
    ///
    /// let result = FilesBuilder::new()
    ///     .add_file("relative/setup.py", "setup()")
    ///     .build();
    ///
    /// assert!(result.is_err());
    /// ```
    pub fn build(self) -> Result<FileTree> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        Ok(self.tree)
    }

    /// Builds the tree and writes it under `base_path` with atomic writes.
    ///
    /// `base_path` is created if missing, and a leading `~` is expanded to
    /// the home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any file path is invalid
    /// - Home directory cannot be determined (when using `~`)
    /// - I/O operations fail (permissions, disk space, etc.)
    pub fn build_and_export(self, base_path: impl AsRef<Path>) -> Result<FileTree> {
        let tree = self.build()?;

        let base = expand_tilde(base_path.as_ref())?;
        fs::create_dir_all(&base).map_err(|e| FilesError::IoError {
            path: base.display().to_string(),
            source: e,
        })?;

        tree.export_to_filesystem(&base)?;
        Ok(tree)
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let Some(path_str) = path.to_str() else {
        return Ok(path.to_path_buf());
    };

    let rest = if path_str == "~" {
        ""
    } else if let Some(rest) = path_str.strip_prefix("~/") {
        rest
    } else {
        return Ok(path.to_path_buf());
    };

    let home = dirs::home_dir().ok_or_else(|| FilesError::IoError {
        path: path_str.to_string(),
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine home directory",
        ),
    })?;

    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use acg_codegen::GeneratedFile;
    use tempfile::TempDir;

    #[test]
    fn test_builder_new() {
        let tree = FilesBuilder::new().build().unwrap();
        assert_eq!(tree.file_count(), 0);
    }

    #[test]
    fn test_add_file_invalid_path() {
        let err = FilesBuilder::new()
            .add_file("/valid.py", "")
            .add_file("relative/path", "content")
            .build()
            .unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_from_generated_code_trailing_slash() {
        let mut code = GeneratedCode::new();
        code.add_file(GeneratedFile::new("LICENSE", "MIT"));

        let tree = FilesBuilder::from_generated_code(code, "/demo/")
            .build()
            .unwrap();
        assert!(tree.exists("/demo/LICENSE"));
    }

    #[test]
    fn test_from_generated_code_rejects_escaping_paths() {
        let mut code = GeneratedCode::new();
        code.add_file(GeneratedFile::new("../outside.py", ""));

        let err = FilesBuilder::from_generated_code(code, "/demo")
            .build()
            .unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_build_and_export_creates_base() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("out/nested");

        let tree = FilesBuilder::new()
            .add_file("/demo/setup.py", "setup()")
            .build_and_export(&base)
            .unwrap();

        assert_eq!(tree.file_count(), 1);
        assert_eq!(
            fs::read_to_string(base.join("demo/setup.py")).unwrap(),
            "setup()"
        );
    }

    #[test]
    fn test_build_and_export_overwrites_existing() {
        let temp = TempDir::new().unwrap();

        FilesBuilder::new()
            .add_file("/setup.py", "original")
            .build_and_export(temp.path())
            .unwrap();
        FilesBuilder::new()
            .add_file("/setup.py", "updated")
            .build_and_export(temp.path())
            .unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("setup.py")).unwrap(),
            "updated"
        );
    }

    #[test]
    fn test_build_and_export_invalid_path_writes_nothing() {
        let temp = TempDir::new().unwrap();

        let err = FilesBuilder::new()
            .add_file("/valid.py", "content")
            .add_file("invalid/relative", "content")
            .build_and_export(temp.path())
            .unwrap_err();

        assert!(err.is_invalid_path());
        assert!(!temp.path().join("valid.py").exists());
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde(Path::new("~/projects")).unwrap();
        assert!(!expanded.to_string_lossy().contains('~'));
        assert!(expanded.ends_with("projects"));

        let home = expand_tilde(Path::new("~")).unwrap();
        assert!(home.is_absolute());

        assert_eq!(
            expand_tilde(Path::new("/absolute/path")).unwrap(),
            Path::new("/absolute/path")
        );
        assert_eq!(
            expand_tilde(Path::new("~user/x")).unwrap(),
            Path::new("~user/x")
        );
    }
}
