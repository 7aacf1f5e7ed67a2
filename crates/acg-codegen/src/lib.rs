//! Client source generation.
//!
//! Turns the `services` section of a configuration into a Python client
//! module using Handlebars templates:
//!
//! 1. [`spec`] parses dotted service paths and endpoint lists
//! 2. [`plan`] orders class, property, request, and root instructions
//! 3. [`assembler`] renders the plan through the [`template_engine`]
//! 4. [`package`] wraps the module in an installable package skeleton

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod assembler;
pub mod generator;
pub mod naming;
pub mod package;
pub mod plan;
pub mod spec;
pub mod template_engine;
pub mod types;

pub use generator::{ClientGenerator, GeneratedPackage};
pub use plan::{EmissionPlan, Instruction, InstructionKind};
pub use template_engine::{Substitutions, TemplateEngine};
pub use types::{GeneratedCode, GeneratedFile};
