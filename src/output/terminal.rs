//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use super::Report;
use crate::checks::Outcome;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string());
    format!("{quoted:>width$}")
}

/// Render a report as coloured text, one line per fact.
pub fn render_text(report: &Report<'_>) -> String {
    let status = match report.outcome {
        Outcome::Valid => "VALID".green().bold(),
        Outcome::Invalid(_) => "INVALID".red().bold(),
        Outcome::Indeterminate => "INDETERMINATE".yellow().bold(),
    };
    let mut lines = vec![format!(
        "{check}: {status} {inputs}",
        check = report.check.on_blue(),
        inputs = report.inputs.join(" ")
    )];

    if let Some(label) = report.label {
        lines.push(format!("  label: {label}"));
    }
    if let Some(e) = report.outcome.error() {
        lines.push(format!("  reason: {e}"));
    }
    for pair in &report.overlaps {
        lines.push(format!(
            "  {i:>4} {first} {j:>4} {second}",
            i = format!("[{}]", pair.first_index),
            first = format_field(pair.first, 22),
            j = format!("[{}]", pair.second_index),
            second = format_field(pair.second, 22),
        ));
    }
    lines.join("\n")
}
