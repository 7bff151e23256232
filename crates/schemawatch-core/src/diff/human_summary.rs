//! Human-readable renderings of a [`ChangeReport`].
//!
//! `render_text_report` is the console output of a monitor run;
//! `render_markdown_summary` is the body used for issues and notifications.

use crate::diff::model::{ChangeClassification, ChangeReport};
use crate::model::fragment::Category;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_categories(out: &mut String, fields: &BTreeMap<Category, BTreeSet<String>>, bullet: &str) {
    for (category, names) in fields {
        let _ = writeln!(out, "{bullet}{} ({}): {}", category, names.len(), join(names));
    }
}

/// Render the plain-text console report.
///
/// Groups field changes by category with counts. Combination deltas are
/// listed as informational.
pub fn render_text_report(report: &ChangeReport) -> String {
    let mut out = String::new();

    if !report.has_changes {
        out.push_str("No schema changes detected.\n");
        if report.classification == ChangeClassification::InformationalOnly {
            let _ = writeln!(
                out,
                "Field combinations (informational): {} new, {} removed",
                report.new_field_combinations.len(),
                report.removed_field_combinations.len()
            );
        }
        return out;
    }

    let _ = writeln!(
        out,
        "Schema changes detected (baseline {} -> current {}, {} entities analyzed)\n",
        short(&report.identity.baseline_hash),
        short(&report.identity.current_hash),
        report.identity.analyzed_entities
    );

    if !report.new_fields.is_empty() {
        let _ = writeln!(out, "New fields ({}):", report.new_field_count());
        write_categories(&mut out, &report.new_fields, "  ");
        out.push('\n');
    }

    if !report.removed_fields.is_empty() {
        let _ = writeln!(out, "Removed fields ({}):", report.removed_field_count());
        write_categories(&mut out, &report.removed_fields, "  ");
        out.push('\n');
    }

    if !report.new_data_types.is_empty() {
        let _ = writeln!(
            out,
            "New data types ({}): {}\n",
            report.new_data_types.len(),
            join(&report.new_data_types)
        );
    }

    if !report.removed_data_types.is_empty() {
        let _ = writeln!(
            out,
            "Removed data types ({}): {}\n",
            report.removed_data_types.len(),
            join(&report.removed_data_types)
        );
    }

    if report.has_combination_deltas() {
        let _ = writeln!(
            out,
            "Field combinations: {} new, {} removed",
            report.new_field_combinations.len(),
            report.removed_field_combinations.len()
        );
        for combo in &report.new_field_combinations {
            let _ = writeln!(out, "  + {}", combo);
        }
    }

    out
}

/// Render the Markdown issue / notification body.
pub fn render_markdown_summary(report: &ChangeReport) -> String {
    if !report.has_changes {
        return "No schema changes detected.\n".to_string();
    }

    let mut out = String::new();
    out.push_str("## Service Reference Schema Changes Detected\n\n");

    if !report.new_fields.is_empty() {
        out.push_str("### New Fields\n\n");
        for (category, names) in &report.new_fields {
            let _ = writeln!(out, "- **{}**: {}", category, join(names));
        }
        out.push('\n');
    }

    if !report.removed_fields.is_empty() {
        out.push_str("### Removed Fields\n\n");
        for (category, names) in &report.removed_fields {
            let _ = writeln!(out, "- **{}**: {}", category, join(names));
        }
        out.push('\n');
    }

    if !report.new_data_types.is_empty() {
        let _ = writeln!(out, "### New Data Types: {}\n", join(&report.new_data_types));
    }

    if !report.removed_data_types.is_empty() {
        let _ = writeln!(
            out,
            "### Removed Data Types: {}\n",
            join(&report.removed_data_types)
        );
    }

    if !report.new_field_combinations.is_empty() {
        out.push_str("### New Field Combinations\n\n");
        for combo in &report.new_field_combinations {
            let _ = writeln!(out, "- `{}`", combo);
        }
        out.push('\n');
    }

    out.push_str("---\n");
    out.push_str(
        "**Action Required**: review these changes and update the consumers of the catalog.\n\n",
    );
    let _ = writeln!(
        out,
        "**Analysis Time**: {}  ",
        report.identity.current_timestamp
    );
    let _ = writeln!(
        out,
        "**Entities Analyzed**: {}",
        report.identity.analyzed_entities
    );

    out
}
