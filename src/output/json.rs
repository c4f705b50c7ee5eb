//! JSON output.

use super::Report;

/// Render a report as a single pretty-printed JSON document.
pub fn render_json(report: &Report<'_>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
