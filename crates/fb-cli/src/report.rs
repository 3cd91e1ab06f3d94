//! Report command: reconciles a session log and prints per-customer totals.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use fb_core::{CustomerSummary, Normalizer, reconcile_file};

use crate::config::{Config, OutputFormat};

/// Runs the report for `log`, writing the rendered output to `writer`.
///
/// Nothing is written unless the whole log was reconciled.
pub fn run<W: Write>(writer: &mut W, log: &Path, config: &Config) -> Result<()> {
    let normalizer = config
        .reference_date
        .map_or_else(Normalizer::today, Normalizer::for_date);
    tracing::debug!(date = %normalizer.date(), "normalizing times of day");

    let output = reconcile_file(log, &normalizer)?;
    let summaries = output.state.summaries();

    let rendered = match config.format {
        OutputFormat::Text => format_report(&summaries),
        OutputFormat::Json => format_report_json(&summaries)?,
    };
    writer.write_all(rendered.as_bytes())?;
    Ok(())
}

/// Formats one `NAME SESSIONS SECONDS` line per customer.
pub fn format_report(summaries: &[CustomerSummary]) -> String {
    let mut output = String::new();
    for summary in summaries {
        writeln!(
            output,
            "{} {} {}",
            summary.name, summary.sessions, summary.seconds
        )
        .unwrap();
    }
    output
}

/// Formats the report as a JSON array, newline terminated.
pub fn format_report_json(summaries: &[CustomerSummary]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(summaries)?;
    json.push('\n');
    Ok(json)
}
