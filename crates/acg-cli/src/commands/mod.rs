//! Command implementations for the `acg` CLI.
//!
//! Each command module loads what it needs, performs the operation, and
//! formats its result according to the requested output format.

pub mod build;
pub mod common;
pub mod completions;
pub mod generate;
pub mod plan;
pub mod publish;
