//! Fingerprint diff computation engine.
//!
//! The entry point is [`compute_diff`], which compares the current aggregate
//! against the stored baseline by pure set arithmetic.

use crate::diff::model::{ChangeClassification, ChangeReport, ReportIdentity};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::fingerprint::AggregateFingerprint;
use crate::model::fragment::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Which deltas raise `has_changes`.
///
/// Field and data-type additions/removals always alert. Removed field
/// combinations never alert. New field combinations alert only when
/// `alert_on_new_combinations` is set; they are too sample-size-sensitive to
/// alert by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPolicy {
    pub alert_on_new_combinations: bool,
}

/// `(added, removed)` where added = in current only, removed = in baseline only.
fn set_delta<T: Ord + Clone>(baseline: &BTreeSet<T>, current: &BTreeSet<T>) -> (BTreeSet<T>, BTreeSet<T>) {
    let added = current.difference(baseline).cloned().collect();
    let removed = baseline.difference(current).cloned().collect();
    (added, removed)
}

/// Compute the change report between `current` and `baseline`.
///
/// # Errors
///
/// - `DeterminismViolation`: the report fails its JSON round-trip check
///   (should never occur in correct builds)
pub fn compute_diff(
    current: &AggregateFingerprint,
    baseline: &AggregateFingerprint,
    policy: DiffPolicy,
) -> Result<ChangeReport> {
    let mut new_fields = BTreeMap::new();
    let mut removed_fields = BTreeMap::new();
    for category in Category::ALL {
        let (added, removed) = set_delta(
            baseline.structure.fields(category),
            current.structure.fields(category),
        );
        if !added.is_empty() {
            new_fields.insert(category, added);
        }
        if !removed.is_empty() {
            removed_fields.insert(category, removed);
        }
    }

    let (new_data_types, removed_data_types) = set_delta(
        &baseline.structure.data_types,
        &current.structure.data_types,
    );
    let (new_field_combinations, removed_field_combinations) = set_delta(
        &baseline.structure.field_combinations,
        &current.structure.field_combinations,
    );

    let structural_change = !new_fields.is_empty()
        || !removed_fields.is_empty()
        || !new_data_types.is_empty()
        || !removed_data_types.is_empty();
    let has_changes = structural_change
        || (policy.alert_on_new_combinations && !new_field_combinations.is_empty());

    let classification = if has_changes {
        ChangeClassification::Changed
    } else if !new_field_combinations.is_empty() || !removed_field_combinations.is_empty() {
        ChangeClassification::InformationalOnly
    } else {
        ChangeClassification::Identical
    };

    let report = ChangeReport {
        report_schema_version: 1,
        identity: ReportIdentity {
            baseline_hash: baseline.schema_hash.clone(),
            baseline_timestamp: baseline.timestamp.clone(),
            current_hash: current.schema_hash.clone(),
            current_timestamp: current.timestamp.clone(),
            analyzed_entities: current.analyzed_entities.len(),
        },
        classification,
        has_changes,
        new_fields,
        removed_fields,
        new_data_types,
        removed_data_types,
        new_field_combinations,
        removed_field_combinations,
    };

    // Determinism guard: round-trip through JSON must produce an equal struct
    let serialized = serde_json::to_string(&report).map_err(|e| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_diff")
            .with_message(format!("failed to serialize report: {}", e))
    })?;
    let reparsed: ChangeReport = serde_json::from_str(&serialized).map_err(|e| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_diff")
            .with_message(format!("failed to re-parse report: {}", e))
    })?;
    if reparsed != report {
        return Err(ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_diff")
            .with_message("report is not deterministic: round-trip produced different struct"));
    }

    Ok(report)
}
