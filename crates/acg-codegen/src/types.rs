//! Types for code generation.
//!
//! Defines the output of the generator: a set of files with paths relative
//! to the output directory.
//!
//! # Examples
//!
//! ```
//! use acg_codegen::{GeneratedCode, GeneratedFile};
//!
//! let file = GeneratedFile {
//!     path: "demo/demo.py".to_string(),
//!     content: "import requests\n".to_string(),
//! };
//!
//! let code = GeneratedCode {
//!     files: vec![file],
//! };
//!
//! assert_eq!(code.file_count(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Result of code generation containing all generated files.
///
/// # Examples
///
/// ```
/// use acg_codegen::GeneratedCode;
///
/// let code = GeneratedCode::new();
/// assert_eq!(code.file_count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// List of generated files with paths and contents
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    /// Creates a new empty generated code container.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Adds a generated file to the collection.
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Returns the number of generated files.
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns an iterator over the generated files.
    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    /// Finds a file by its relative path.
    ///
    /// # Examples
    ///
    /// ```
    /// use acg_codegen::{GeneratedCode, GeneratedFile};
    ///
    /// let mut code = GeneratedCode::new();
    /// code.add_file(GeneratedFile::new("LICENSE", "MIT License\n"));
    ///
    /// assert!(code.get("LICENSE").is_some());
    /// assert!(code.get("setup.py").is_none());
    /// ```
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// A single generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Relative path where the file should be written
    pub path: String,
    /// File content
    pub content: String,
}

impl GeneratedFile {
    /// Creates a file entry.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns the file path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the file content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_new() {
        let code = GeneratedCode::new();
        assert_eq!(code.file_count(), 0);
    }

    #[test]
    fn test_add_and_get_file() {
        let mut code = GeneratedCode::default();
        code.add_file(GeneratedFile::new("requirements.txt", "requests\n"));
        code.add_file(GeneratedFile::new("demo/__init__.py", ""));

        assert_eq!(code.file_count(), 2);
        assert_eq!(
            code.get("requirements.txt").map(GeneratedFile::content),
            Some("requests\n")
        );
        assert_eq!(code.files().next().map(GeneratedFile::path), Some("requirements.txt"));
    }
}
