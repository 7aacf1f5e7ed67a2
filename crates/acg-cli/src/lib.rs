//! API client generator CLI library.
//!
//! Exposes the argument definitions, command handlers, and formatters of
//! the `acg` binary so they can be tested without spawning it.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

pub mod cli;
pub mod commands;
pub mod formatters;
pub mod publish;
pub mod runner;

pub use cli::{Cli, Commands, ConfigArgs, OutputArgs};
