//! Package tree for generated API clients.
//!
//! Collects generated files in memory under validated Unix-style paths and
//! exports them to disk with atomic writes.
//!
//! # Examples
//!
//! ```
//! use acg_files::FilesBuilder;
//! use acg_codegen::{GeneratedCode, GeneratedFile};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let mut code = GeneratedCode::new();
//! code.add_file(GeneratedFile::new("setup.py", "setup()"));
//! code.add_file(GeneratedFile::new("demo/demo.py", "import requests"));
//!
//! let tree = FilesBuilder::from_generated_code(code, "/demo")
//!     .build_and_export(temp.path())
//!     .unwrap();
//!
//! assert_eq!(tree.file_count(), 2);
//! assert!(temp.path().join("demo/demo/demo.py").exists());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod filesystem;
pub mod tree;
pub mod types;

pub use builder::{FilesBuilder, expand_tilde};
pub use tree::FileTree;
pub use types::{FileEntry, FilePath, FilesError, Result};
