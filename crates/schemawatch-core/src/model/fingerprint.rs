//! Aggregate fingerprint: the unioned structure of a sample of entities.

use crate::digest::compute_structure_digest;
use crate::errors::Result;
use crate::model::fragment::StructureFragment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Union of every sampled [`StructureFragment`] plus run metadata.
///
/// The same type is the baseline once persisted. On disk the structure sets
/// are flattened next to `analyzed_entities`, `entity_variations`,
/// `timestamp` and `schema_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateFingerprint {
    /// Sampled entities, in selection order
    #[serde(default, alias = "analyzed_services")]
    pub analyzed_entities: Vec<String>,
    #[serde(flatten)]
    pub structure: StructureFragment,
    /// Per-entity fragment for traceability
    #[serde(default, alias = "service_variations")]
    pub entity_variations: BTreeMap<String, StructureFragment>,
    /// RFC 3339 time the fingerprint was built or persisted
    pub timestamp: String,
    /// SHA256 over the canonical structure (see [`crate::digest`])
    pub schema_hash: String,
}

impl AggregateFingerprint {
    /// Build a fingerprint and compute its `schema_hash`.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the structure cannot be serialized.
    pub fn new(
        analyzed_entities: Vec<String>,
        structure: StructureFragment,
        entity_variations: BTreeMap<String, StructureFragment>,
        timestamp: impl Into<String>,
    ) -> Result<Self> {
        let schema_hash = compute_structure_digest(&structure)?;
        Ok(Self {
            analyzed_entities,
            structure,
            entity_variations,
            timestamp: timestamp.into(),
            schema_hash,
        })
    }

    /// Replace the timestamp and recompute the hash.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the structure cannot be serialized.
    pub fn stamp(&mut self, timestamp: impl Into<String>) -> Result<()> {
        self.timestamp = timestamp.into();
        self.schema_hash = compute_structure_digest(&self.structure)?;
        Ok(())
    }

    /// True when the recorded `schema_hash` matches the structure.
    pub fn hash_matches(&self) -> bool {
        compute_structure_digest(&self.structure)
            .map(|h| h == self.schema_hash)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip_flattens_structure() {
        let fp = AggregateFingerprint::new(
            vec!["s3".into()],
            StructureFragment {
                top_level_fields: ["Name".to_string()].into_iter().collect(),
                ..Default::default()
            },
            BTreeMap::new(),
            "2026-01-01T00:00:00Z",
        )
        .unwrap();

        let value = serde_json::to_value(&fp).unwrap();
        assert_eq!(value["top_level_fields"], json!(["Name"]));
        assert_eq!(value["analyzed_entities"], json!(["s3"]));
        assert_eq!(value["schema_hash"].as_str().unwrap().len(), 64);

        let back: AggregateFingerprint = serde_json::from_value(value).unwrap();
        assert_eq!(back, fp);
        assert!(back.hash_matches());
    }

    #[test]
    fn test_accepts_legacy_field_names() {
        let fp: AggregateFingerprint = serde_json::from_value(json!({
            "analyzed_services": ["iam"],
            "top_level_fields": ["Name"],
            "action_fields": [],
            "resource_fields": [],
            "condition_key_fields": [],
            "data_types": [],
            "field_combinations": [],
            "service_variations": {},
            "timestamp": "2025-01-01T00:00:00.000000",
            "schema_hash": "legacy"
        }))
        .unwrap();
        assert_eq!(fp.analyzed_entities, vec!["iam"]);
        assert!(!fp.hash_matches());
    }

    #[test]
    fn test_stamp_keeps_hash_stable() {
        let mut fp = AggregateFingerprint::new(
            Vec::new(),
            StructureFragment::default(),
            BTreeMap::new(),
            "t1",
        )
        .unwrap();
        let before = fp.schema_hash.clone();
        fp.stamp("t2").unwrap();
        assert_eq!(fp.timestamp, "t2");
        assert_eq!(fp.schema_hash, before);
    }
}
