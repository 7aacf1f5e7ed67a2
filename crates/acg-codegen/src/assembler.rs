//! Turns an emission plan into client source text.
//!
//! Each instruction maps to exactly one template; fragments are written to
//! the sink in plan order behind a fixed header.

use crate::plan::{EmissionPlan, Instruction};
use crate::template_engine::{
    API_CLIENT, CLASS, IMPORTS, PROPERTY, REQUEST, Substitutions, TemplateEngine,
};
use acg_core::{Error, Result};
use std::fmt::Write as _;
use std::io::Write;

/// Renders plans through a [`TemplateEngine`].
///
/// # Examples
///
/// ```
/// use acg_codegen::assembler::CodeAssembler;
/// use acg_codegen::plan::{EmissionPlan, Instruction};
/// use acg_codegen::template_engine::TemplateEngine;
///
/// let engine = TemplateEngine::new().unwrap();
/// let plan = EmissionPlan::from(vec![Instruction::DefineClass {
///     class: "Users".to_string(),
/// }]);
///
/// let source = CodeAssembler::new(&engine).assemble_to_string(&plan).unwrap();
/// assert!(source.starts_with("# Generated by acg"));
/// assert!(source.contains("class Users(object):"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CodeAssembler<'e> {
    engine: &'e TemplateEngine,
}

impl<'e> CodeAssembler<'e> {
    /// Creates an assembler borrowing `engine`.
    #[must_use]
    pub const fn new(engine: &'e TemplateEngine) -> Self {
        Self { engine }
    }

    /// Writes the header and every instruction's fragment to `out`.
    ///
    /// Output is append-only. On error the sink may hold a prefix of the
    /// module, which the caller must discard.
    ///
    /// # Errors
    ///
    /// Returns a template error if a fragment cannot be rendered, or
    /// [`Error::Io`] if the sink rejects a write.
    pub fn assemble<W: Write>(&self, plan: &EmissionPlan, out: &mut W) -> Result<()> {
        let header = self.engine.render_template(IMPORTS, None)?;
        write_fragment(out, &header)?;

        for instruction in plan.iter() {
            let fragment = self.fragment(instruction)?;
            write_fragment(out, &fragment)?;
            tracing::debug!("Emitted {instruction}");
        }

        out.flush()
            .map_err(|e| Error::io("flushing generated client", e))
    }

    /// Assembles into an in-memory string.
    ///
    /// # Errors
    ///
    /// Returns a template error if a fragment cannot be rendered.
    pub fn assemble_to_string(&self, plan: &EmissionPlan) -> Result<String> {
        let mut buffer = Vec::new();
        self.assemble(plan, &mut buffer)?;

        // Every fragment comes from a &str, so the buffer is valid UTF-8
        String::from_utf8(buffer).map_err(|e| Error::TemplateSyntax {
            template: IMPORTS.to_string(),
            message: e.to_string(),
        })
    }

    /// Renders the fragment for one instruction.
    ///
    /// # Errors
    ///
    /// Returns a template error if rendering fails.
    pub fn fragment(&self, instruction: &Instruction) -> Result<String> {
        let (template, substitutions) = match instruction {
            Instruction::DefineClass { class } | Instruction::DefineRootClient { class } => {
                (CLASS, Substitutions::new().with("class", class))
            }
            Instruction::LinkProperty {
                class,
                property,
                target,
            }
            | Instruction::LinkRootProperty {
                class,
                property,
                target,
            } => (
                PROPERTY,
                Substitutions::new()
                    .with("class", class)
                    .with("property", property)
                    .with("class_second", target),
            ),
            Instruction::DefineRequest {
                class,
                method,
                verb,
                url,
            } => (
                REQUEST,
                Substitutions::new()
                    .with("class", class)
                    .with("endpoint", method)
                    .with("http_method", escape_single_quoted(verb))
                    .with("url", escape_single_quoted(url)),
            ),
            Instruction::AssignSingleton { object, class } => (
                API_CLIENT,
                Substitutions::new()
                    .with("api_object", object)
                    .with("api_class", class),
            ),
        };

        self.engine.render_template(template, Some(&substitutions))
    }
}

/// Escapes `value` for use inside a single-quoted Python string literal.
///
/// # Examples
///
/// ```
/// use acg_codegen::assembler::escape_single_quoted;
///
/// assert_eq!(escape_single_quoted("/search?q=o'brien"), r"/search?q=o\'brien");
/// assert_eq!(escape_single_quoted(r"a\b"), r"a\\b");
/// ```
#[must_use]
pub fn escape_single_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => {
                // Writing to a String cannot fail
                let _ = write!(escaped, "\\x{:02x}", u32::from(c));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

fn write_fragment<W: Write>(out: &mut W, fragment: &str) -> Result<()> {
    out.write_all(fragment.as_bytes())
        .map_err(|e| Error::io("writing generated client", e))
}
