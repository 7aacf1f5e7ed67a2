//! Core types, configuration, and errors for the API client generator.
//!
//! This crate provides the foundational types shared by every other crate
//! in the workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Error hierarchy with contextual information
//! - The immutable [`Configuration`] parsed once from `.acg.yml`
//! - CLI value types (`OutputFormat`, `ExitCode`)
//! - The identifier rule shared by package, segment, and method names

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;

pub mod cli;
pub mod identifier;

pub use config::{
    Configuration, DEFAULT_CONFIG_FILE, GeneratorSettings, RegistryCredentials, ServiceEntry,
};
pub use error::{Error, Result};
