//! Rendering of check results for the command line.
//!
//! - [`terminal`] - Coloured text output
//! - [`json`] - One JSON document per check

mod json;
mod terminal;

use crate::checks::Outcome;
use crate::config::OutputFormat;
use crate::models::OverlapPair;
use crate::processing::Label;
use serde::Serialize;

pub use json::render_json;
pub use terminal::{format_field, render_text};

/// Everything printed for one check.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    /// Check name as given on the command line.
    pub check: &'a str,
    pub inputs: Vec<String>,
    pub outcome: &'a Outcome,
    /// Every overlapping pair, for the overlap check.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlaps: Vec<OverlapPair>,
    /// Classification of the input, when one was computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl<'a> Report<'a> {
    pub fn new(check: &'a str, inputs: Vec<String>, outcome: &'a Outcome) -> Report<'a> {
        Report {
            check,
            inputs,
            outcome,
            overlaps: vec![],
            label: None,
        }
    }
}

/// Render a report in the configured format.
pub fn render(report: &Report<'_>, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
    }
}
