//! Change report types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections use `BTreeMap` / `BTreeSet` for deterministic serialization.

use crate::model::fragment::{Category, FieldCombination};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Structured result of diffing a current fingerprint against the baseline.
///
/// `new_fields` and `removed_fields` only contain categories with at least
/// one entry. Combination deltas are informational: they never set
/// `has_changes` unless the policy opts in to new combinations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeReport {
    /// Schema version of this report structure (always 1)
    pub report_schema_version: u32,
    pub identity: ReportIdentity,
    pub classification: ChangeClassification,
    pub has_changes: bool,
    pub new_fields: BTreeMap<Category, BTreeSet<String>>,
    pub removed_fields: BTreeMap<Category, BTreeSet<String>>,
    pub new_data_types: BTreeSet<String>,
    pub removed_data_types: BTreeSet<String>,
    pub new_field_combinations: BTreeSet<FieldCombination>,
    /// Never alertable: small samples routinely miss combinations
    pub removed_field_combinations: BTreeSet<FieldCombination>,
}

/// Hash and timestamp of both sides of the diff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportIdentity {
    pub baseline_hash: String,
    pub baseline_timestamp: String,
    pub current_hash: String,
    pub current_timestamp: String,
    /// Number of entities that contributed to the current fingerprint
    pub analyzed_entities: usize,
}

/// High-level classification of the report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeClassification {
    /// No deltas of any kind
    Identical,
    /// Only non-alerting deltas (field combinations)
    InformationalOnly,
    /// At least one alerting delta
    Changed,
}

impl ChangeReport {
    /// Total number of new field names across all categories.
    pub fn new_field_count(&self) -> usize {
        self.new_fields.values().map(BTreeSet::len).sum()
    }

    /// Total number of removed field names across all categories.
    pub fn removed_field_count(&self) -> usize {
        self.removed_fields.values().map(BTreeSet::len).sum()
    }

    pub fn has_combination_deltas(&self) -> bool {
        !self.new_field_combinations.is_empty() || !self.removed_field_combinations.is_empty()
    }
}
