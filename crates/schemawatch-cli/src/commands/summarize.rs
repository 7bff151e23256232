//! Summarize command
//!
//! Turns the JSON output of a monitor run into the Markdown body used for
//! issues and notifications.

use super::CommandResult;
use clap::Args;
use schemawatch_core::errors::{ExError, ExErrorKind};
use schemawatch_core::render::{parse_report, render, OutputFormat, EXIT_OK};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Results file written by `monitor --output-format json`
    pub results: PathBuf,
}

pub fn execute(args: SummarizeArgs) -> CommandResult {
    let text = fs::read_to_string(&args.results).map_err(|e| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("summarize")
            .with_path(args.results.display().to_string())
            .with_message(e.to_string())
    })?;
    print!("{}", summarize(&text)?);
    Ok(EXIT_OK)
}

/// Markdown body for a monitor result, or for a bare change report.
fn summarize(text: &str) -> Result<String, ExError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("summarize")
            .with_message(format!("results are not JSON: {}", e))
    })?;

    if value.get("status").and_then(|s| s.as_str()) == Some("baseline_created") {
        return Ok("Baseline created; no comparison was performed.\n".to_string());
    }

    let report_json = value.get("changes").unwrap_or(&value).to_string();
    let report = parse_report(&report_json)?;
    render(&report, OutputFormat::Markdown)
}
