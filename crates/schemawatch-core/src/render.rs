//! Report rendering and exit-code mapping.
//!
//! The exit code is the sole integration point for CI-style callers:
//!
//! | Code | Meaning |
//! |---|---|
//! | 0 | no changes, or baseline created |
//! | 1 | changes detected |
//! | 2 | fatal infrastructure or configuration failure |

use crate::diff::human_summary::{render_markdown_summary, render_text_report};
use crate::diff::model::ChangeReport;
use crate::errors::{ExError, ExErrorKind, Result};
use std::fmt;
use std::str::FromStr;

pub const EXIT_OK: i32 = 0;
pub const EXIT_CHANGES: i32 = 1;
pub const EXIT_FAILURE: i32 = 2;

/// Output format for rendered reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    /// Lossless machine-readable form
    Json,
    /// Issue / notification body
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_output_format")
                .with_message(format!("unknown output format `{}`", other))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        })
    }
}

/// Render a change report in the requested format.
///
/// # Errors
///
/// Returns `Serialization` if JSON rendering fails.
pub fn render(report: &ChangeReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text_report(report)),
        OutputFormat::Markdown => Ok(render_markdown_summary(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Parse the JSON rendering of a report back into a [`ChangeReport`].
///
/// # Errors
///
/// Returns `Serialization` if the text is not a valid report.
pub fn parse_report(json: &str) -> Result<ChangeReport> {
    serde_json::from_str(json).map_err(|e| {
        ExError::new(ExErrorKind::Serialization)
            .with_op("parse_report")
            .with_message(e.to_string())
    })
}

/// Exit code for a completed diff: non-zero iff the report has changes.
pub fn exit_code(report: &ChangeReport) -> i32 {
    if report.has_changes {
        EXIT_CHANGES
    } else {
        EXIT_OK
    }
}

/// Exit code for a run that failed before producing a report.
///
/// Always distinct from [`EXIT_CHANGES`] so callers can tell a broken run
/// from a real change.
pub fn exit_code_for_error(_err: &ExError) -> i32 {
    EXIT_FAILURE
}
