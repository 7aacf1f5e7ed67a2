//! Export of a [`FileTree`] to the real filesystem.
//!
//! Directories are created first in one pass, then files are written in
//! path order. Each file is written to a hidden sibling and renamed into
//! place, so a reader never observes a partially written
//! file and a failed run leaves the previous content untouched.
//!
//! # Examples
//!
//! ```
//! use acg_files::FilesBuilder;
//! # use tempfile::TempDir;
//!
//! # let temp_dir = TempDir::new().unwrap();
//! # let output_dir = temp_dir.path();
//! let tree = FilesBuilder::new()
//!     .add_file("/demo/setup.py", "setup()")
//!     .add_file("/demo/demo/demo.py", "import requests")
//!     .build()
//!     .unwrap();
//!
//! tree.export_to_filesystem(output_dir).unwrap();
//!
//! assert!(output_dir.join("demo/demo/demo.py").exists());
//! ```

use crate::tree::FileTree;
use crate::types::{FilesError, Result};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

impl FileTree {
    /// Exports the tree under `base_path`, replacing existing files.
    ///
    /// Returns the disk paths that were written, in path order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Base path does not exist
    /// - Base path cannot be canonicalized
    /// - I/O operations fail during directory creation or file writing
    pub fn export_to_filesystem(&self, base_path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let base = base_path.as_ref();

        if !base.exists() {
            return Err(FilesError::FileNotFound {
                path: base.display().to_string(),
            });
        }

        let canonical_base = base.canonicalize().map_err(|e| FilesError::IoError {
            path: base.display().to_string(),
            source: e,
        })?;

        // Phase 1: create every directory the tree needs
        for dir in self.collect_directories(&canonical_base) {
            fs::create_dir_all(&dir).map_err(|e| FilesError::IoError {
                path: dir.display().to_string(),
                source: e,
            })?;
        }

        // Phase 2: write files
        let mut written = Vec::with_capacity(self.file_count());
        for (path, file) in self.files() {
            let disk_path = canonical_base.join(path.relative());
            write_file(&disk_path, file.content())?;
            tracing::debug!("Wrote {}", disk_path.display());
            written.push(disk_path);
        }

        Ok(written)
    }

    fn collect_directories(&self, base: &Path) -> BTreeSet<PathBuf> {
        self.files()
            .filter_map(|(path, _)| base.join(path.relative()).parent().map(Path::to_path_buf))
            .filter(|dir| dir.as_path() != base)
            .collect()
    }
}

/// Writes one file through a staging sibling and renames it into place.
fn write_file(path: &Path, content: &str) -> Result<()> {
    let temp_path = temp_path_for(path)?;
    let result = write_and_sync(&temp_path, content).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| FilesError::IoError {
            path: path.display().to_string(),
            source: e,
        })
    });

    if result.is_err() {
        // Best effort cleanup
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_sync(path: &Path, content: &str) -> Result<()> {
    let io_error = |e| FilesError::IoError {
        path: path.display().to_string(),
        source: e,
    };

    let mut file = fs::File::create(path).map_err(io_error)?;
    file.write_all(content.as_bytes()).map_err(io_error)?;
    file.sync_all().map_err(io_error)
}

/// Hidden sibling used as the staging file, e.g. `.setup.py.tmp`.
fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| FilesError::InvalidPath {
            path: path.display().to_string(),
        })?;
    Ok(path.with_file_name(format!(".{name}.tmp")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilesBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_export_single_file() {
        let temp = TempDir::new().unwrap();
        let tree = FilesBuilder::new()
            .add_file("/requirements.txt", "requests\n")
            .build()
            .unwrap();

        let written = tree.export_to_filesystem(temp.path()).unwrap();

        assert_eq!(written.len(), 1);
        assert_eq!(
            fs::read_to_string(temp.path().join("requirements.txt")).unwrap(),
            "requests\n"
        );
    }

    #[test]
    fn test_export_package_layout() {
        let temp = TempDir::new().unwrap();
        let tree = FilesBuilder::new()
            .add_file("/demo/setup.py", "setup()")
            .add_file("/demo/LICENSE", "MIT")
            .add_file("/demo/demo/__init__.py", "")
            .add_file("/demo/demo/demo.py", "import requests")
            .build()
            .unwrap();

        tree.export_to_filesystem(temp.path()).unwrap();

        assert!(temp.path().join("demo/setup.py").is_file());
        assert!(temp.path().join("demo/LICENSE").is_file());
        assert!(temp.path().join("demo/demo").is_dir());
        assert_eq!(
            fs::read_to_string(temp.path().join("demo/demo/__init__.py")).unwrap(),
            ""
        );
    }

    #[test]
    fn test_export_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("LICENSE");
        fs::write(&path, "old content").unwrap();

        let tree = FilesBuilder::new()
            .add_file("/LICENSE", "new content")
            .build()
            .unwrap();
        tree.export_to_filesystem(temp.path()).unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "new content");
    }

    #[test]
    fn test_export_atomic_leaves_no_staging_files() {
        let temp = TempDir::new().unwrap();
        let tree = FilesBuilder::new()
            .add_file("/setup.py", "setup()")
            .add_file("/setup.tmp", "unrelated")
            .build()
            .unwrap();

        tree.export_to_filesystem(temp.path()).unwrap();

        assert_eq!(fs::read_to_string(temp.path().join("setup.py")).unwrap(), "setup()");
        assert_eq!(
            fs::read_to_string(temp.path().join("setup.tmp")).unwrap(),
            "unrelated"
        );
        assert!(!temp.path().join(".setup.py.tmp").exists());
    }

    #[test]
    fn test_export_failure_keeps_previous_content() {
        let temp = TempDir::new().unwrap();
        // A directory where the file should go makes the rename fail
        fs::create_dir_all(temp.path().join("demo.py")).unwrap();
        fs::write(temp.path().join("demo.py/keep.txt"), "keep").unwrap();

        let tree = FilesBuilder::new()
            .add_file("/demo.py", "import requests")
            .build()
            .unwrap();

        let err = tree.export_to_filesystem(temp.path()).unwrap_err();
        assert!(err.is_io_error());
        assert!(temp.path().join("demo.py/keep.txt").exists());
        assert!(!temp.path().join(".demo.py.tmp").exists());
    }

    #[test]
    fn test_export_invalid_base_path() {
        let tree = FilesBuilder::new().add_file("/x.py", "").build().unwrap();
        let err = tree
            .export_to_filesystem("/nonexistent/path/that/does/not/exist")
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
