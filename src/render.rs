//! Turns a [`RunOutcome`] into text or JSON. Nothing else in the library prints.

use crate::core::Diagnostic;
use crate::runner::{RunOutcome, RunStats};
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    issues: &'a [Diagnostic],
    report: JsonRunInfo<'a>,
}

#[derive(Serialize)]
struct JsonRunInfo<'a> {
    stats: &'a RunStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// One diagnostic per entry: `file:line[:col]: message (linter)` followed by
/// the source lines, if attached.
pub fn render_text(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        let message = match d.severity.as_str() {
            "error" => d.message.red(),
            "warning" => d.message.yellow(),
            _ => d.message.normal(),
        };
        out.push_str(&format!(
            "{}: {} {}\n",
            d.position().bold(),
            message,
            format!("({})", d.from_linter).dimmed()
        ));
        for line in &d.source_lines {
            out.push_str(line);
            out.push('\n');
        }
        if let Some(column) = d.column.filter(|_| d.source_lines.len() == 1) {
            out.push_str(&" ".repeat(column.saturating_sub(1)));
            out.push_str("^\n");
        }
    }
    out
}

pub fn render_json(outcome: &RunOutcome) -> serde_json::Result<String> {
    let errors = outcome
        .errors
        .as_ref()
        .map(|errors| errors.errors().iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    serde_json::to_string_pretty(&JsonReport {
        issues: &outcome.diagnostics,
        report: JsonRunInfo {
            stats: &outcome.stats,
            errors,
        },
    })
}
