//! In-memory package tree.
//!
//! Files are kept in a `BTreeMap` so iteration and export always happen in
//! path order.
//!
//! # Examples
//!
//! ```
//! use acg_files::FileTree;
//!
//! let mut tree = FileTree::new();
//! tree.add_file("/demo/requirements.txt", "requests\n").unwrap();
//!
//! assert!(tree.exists("/demo/requirements.txt"));
//! assert!(!tree.exists("/demo/setup.py"));
//! assert_eq!(tree.total_bytes(), 9);
//! ```

use crate::types::{FileEntry, FilePath, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// An in-memory tree of generated files.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    files: BTreeMap<FilePath, FileEntry>,
}

impl FileTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any file already at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid (not absolute, contains
    /// '..', etc.).
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Result<()> {
        let path = FilePath::new(path)?;
        self.files.insert(path, FileEntry::new(content));
        Ok(())
    }

    /// Checks if a file exists. Invalid paths never exist.
    #[must_use]
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        FilePath::new(path)
            .ok()
            .is_some_and(|p| self.files.contains_key(&p))
    }

    /// Total number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total size of all files in bytes.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.files.values().map(FileEntry::size).sum()
    }

    /// All paths, sorted.
    #[must_use]
    pub fn all_paths(&self) -> Vec<&FilePath> {
        self.files.keys().collect()
    }

    /// Iterates `(path, file)` pairs in path order.
    pub fn files(&self) -> impl Iterator<Item = (&FilePath, &FileEntry)> {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> FileTree {
        let mut tree = FileTree::new();
        tree.add_file("/demo/setup.py", "setup()").unwrap();
        tree.add_file("/demo/LICENSE", "MIT").unwrap();
        tree.add_file("/demo/demo/__init__.py", "").unwrap();
        tree.add_file("/demo/demo/demo.py", "import requests").unwrap();
        tree
    }

    fn content<'a>(tree: &'a FileTree, path: &str) -> Option<&'a str> {
        tree.files()
            .find(|(p, _)| p.as_str() == path)
            .map(|(_, file)| file.content())
    }

    #[test]
    fn test_add_file() {
        let tree = package();
        assert_eq!(tree.file_count(), 4);
        assert_eq!(content(&tree, "/demo/setup.py"), Some("setup()"));
        assert!(tree.exists("/demo/demo/demo.py"));
        assert!(!tree.exists("/demo/README.md"));
    }

    #[test]
    fn test_add_replaces_existing() {
        let mut tree = package();
        tree.add_file("/demo/LICENSE", "Apache").unwrap();
        assert_eq!(tree.file_count(), 4);
        assert_eq!(content(&tree, "/demo/LICENSE"), Some("Apache"));
    }

    #[test]
    fn test_add_rejects_relative_path() {
        let err = FileTree::new().add_file("demo/setup.py", "").unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[test]
    fn test_exists_with_invalid_path() {
        assert!(!package().exists("demo/setup.py"));
    }

    #[test]
    fn test_all_paths_sorted() {
        let tree = package();
        let paths: Vec<&str> = tree.all_paths().into_iter().map(FilePath::as_str).collect();
        assert_eq!(
            paths,
            vec![
                "/demo/LICENSE",
                "/demo/demo/__init__.py",
                "/demo/demo/demo.py",
                "/demo/setup.py"
            ]
        );
    }

    #[test]
    fn test_total_bytes() {
        assert_eq!(package().total_bytes(), 7 + 3 + 15);
    }
}
