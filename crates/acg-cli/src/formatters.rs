//! Output formatters for CLI commands.
//!
//! Every command result is a serializable value rendered in one of three
//! modes: JSON for machines, indented plain text for scripts, and a
//! colorized variant of the text layout for terminals.

use acg_core::cli::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if the data cannot be serialized.
///
/// # Examples
///
/// ```
/// use acg_cli::formatters::format_output;
/// use acg_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     package: String,
///     files: usize,
/// }
///
/// let summary = Summary {
///     package: "demo".to_string(),
///     files: 5,
/// };
///
/// let output = format_output(&summary, OutputFormat::Text)?;
/// assert_eq!(output, "package: demo\nfiles: 5");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as JSON with 2-space indentation.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize, Style, render};

    /// Format data as indented `key: value` lines without colors.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(render(&value, Style::Plain))
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Result, Serialize, Style, render};

    /// Format data as colorized `key: value` lines.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(render(&value, Style::Colored))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Plain,
    Colored,
}

fn render(value: &Value, style: Style) -> String {
    let mut lines = Vec::new();
    match value {
        Value::Object(_) | Value::Array(_) => render_nested(value, 0, style, &mut lines),
        scalar => lines.push(render_scalar(scalar, style)),
    }
    lines.join("\n")
}

fn render_nested(value: &Value, indent: usize, style: Style, lines: &mut Vec<String>) {
    let pad = "  ".repeat(indent);

    match value {
        Value::Object(map) => {
            for (key, item) in map {
                let key = match style {
                    Style::Plain => key.clone(),
                    Style::Colored => key.blue().bold().to_string(),
                };
                if is_empty_or_scalar(item) {
                    lines.push(format!("{pad}{key}: {}", render_scalar(item, style)));
                } else {
                    lines.push(format!("{pad}{key}:"));
                    render_nested(item, indent + 1, style, lines);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if is_empty_or_scalar(item) {
                    lines.push(format!("{pad}- {}", render_scalar(item, style)));
                } else {
                    lines.push(format!("{pad}-"));
                    render_nested(item, indent + 1, style, lines);
                }
            }
        }
        scalar => lines.push(format!("{pad}{}", render_scalar(scalar, style))),
    }
}

fn is_empty_or_scalar(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => true,
    }
}

fn render_scalar(value: &Value, style: Style) -> String {
    let plain = match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    };

    if style == Style::Plain {
        return plain;
    }

    match value {
        Value::Null => plain.dimmed().to_string(),
        Value::Bool(_) => plain.yellow().to_string(),
        Value::Number(_) => plain.cyan().to_string(),
        Value::String(_) => plain.green().to_string(),
        Value::Array(_) | Value::Object(_) => plain,
    }
}
