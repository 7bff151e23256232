//! Property-based tests for fingerprint aggregation.
//!
//! The fold must be insensitive to the order entities arrive in, every
//! aggregate set must be exactly the union of the per-entity fragments, and
//! adding an entity may only grow the aggregate sets.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use schemawatch_core::model::Node;
use schemawatch_core::{aggregate, extract, Category, StructureFragment};
use std::collections::BTreeSet;
use serde_json::{json, Map, Value};

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Name",
        "Annotations",
        "Resources",
        "ARNFormats",
        "ConditionKeys",
        "Types",
        "Version",
    ])
    .prop_map(str::to_string)
}

fn entry_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_set(key_strategy(), 1..4).prop_map(|keys| {
        let map: Map<String, Value> = keys.into_iter().map(|k| (k, json!("v"))).collect();
        Value::Object(map)
    })
}

fn condition_key_strategy() -> impl Strategy<Value = Value> {
    prop::sample::select(vec!["String", "Bool", "ARN", "Numeric", "Date"])
        .prop_map(|t| json!({"Name": "k", "Types": [t]}))
}

fn document_strategy() -> impl Strategy<Value = Value> {
    (
        prop::collection::vec(entry_strategy(), 0..4),
        prop::collection::vec(entry_strategy(), 0..3),
        prop::collection::vec(condition_key_strategy(), 0..3),
    )
        .prop_map(|(actions, resources, condition_keys)| {
            json!({
                "Name": "entity",
                "Actions": actions,
                "Resources": resources,
                "ConditionKeys": condition_keys,
            })
        })
}

fn sample_strategy() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec(document_strategy(), 1..6).prop_map(|docs| {
        docs.into_iter()
            .enumerate()
            .map(|(i, doc)| (format!("entity-{}", i), doc))
            .collect()
    })
}

fn to_nodes(sample: &[(String, Value)]) -> Vec<(String, Node)> {
    sample
        .iter()
        .map(|(name, doc)| (name.clone(), Node::from(doc.clone())))
        .collect()
}

proptest! {
    /// Reordering the sample never changes the structure or its hash
    #[test]
    fn aggregation_is_order_independent(sample in sample_strategy()) {
        let forward = aggregate(to_nodes(&sample), "t").unwrap().fingerprint;
        let mut reversed_sample = sample.clone();
        reversed_sample.reverse();
        let reversed = aggregate(to_nodes(&reversed_sample), "t").unwrap().fingerprint;

        prop_assert_eq!(&forward.structure, &reversed.structure);
        prop_assert_eq!(&forward.schema_hash, &reversed.schema_hash);
        prop_assert_eq!(&forward.entity_variations, &reversed.entity_variations);
    }

    /// Each aggregate set is the union of what `extract` finds per entity
    #[test]
    fn aggregation_equals_union_of_fragments(sample in sample_strategy()) {
        let aggregated = aggregate(to_nodes(&sample), "t").unwrap().fingerprint.structure;
        let fragments: Vec<StructureFragment> = to_nodes(&sample)
            .iter()
            .map(|(_, node)| extract(node).unwrap())
            .collect();

        for category in Category::ALL {
            let union: BTreeSet<String> = fragments
                .iter()
                .flat_map(|f| f.fields(category).iter().cloned())
                .collect();
            prop_assert_eq!(aggregated.fields(category), &union);
        }
        let data_types: BTreeSet<String> = fragments
            .iter()
            .flat_map(|f| f.data_types.iter().cloned())
            .collect();
        prop_assert_eq!(&aggregated.data_types, &data_types);
        let combinations: BTreeSet<_> = fragments
            .iter()
            .flat_map(|f| f.field_combinations.iter().cloned())
            .collect();
        prop_assert_eq!(&aggregated.field_combinations, &combinations);
    }

    /// Adding an entity only grows every set
    #[test]
    fn aggregation_is_monotonic(sample in sample_strategy(), extra in document_strategy()) {
        let before = aggregate(to_nodes(&sample), "t").unwrap().fingerprint;
        let mut grown = sample.clone();
        grown.push(("entity-extra".to_string(), extra));
        let after = aggregate(to_nodes(&grown), "t").unwrap().fingerprint;

        for category in Category::ALL {
            prop_assert!(before.structure.fields(category).is_subset(after.structure.fields(category)));
        }
        prop_assert!(before.structure.data_types.is_subset(&after.structure.data_types));
        prop_assert!(before
            .structure
            .field_combinations
            .is_subset(&after.structure.field_combinations));
    }

    /// Every sampled entity is analyzed exactly once
    #[test]
    fn aggregation_counts_each_entity(sample in sample_strategy()) {
        let aggregation = aggregate(to_nodes(&sample), "t").unwrap();
        prop_assert_eq!(aggregation.fingerprint.analyzed_entities.len(), sample.len());
        prop_assert!(aggregation.skipped.is_empty());
    }
}

#[test]
fn test_one_malformed_entity_of_n_is_skipped() {
    let sample = vec![
        ("s3".to_string(), Node::from(json!({"Name": "s3", "Actions": [{"Name": "GetObject"}]}))),
        ("broken".to_string(), Node::from(json!(["not", "a", "service"]))),
        ("iam".to_string(), Node::from(json!({"Name": "iam", "Resources": [{"Name": "role"}]}))),
    ];

    let aggregation = aggregate(sample, "2026-01-01T00:00:00Z").unwrap();

    assert_eq!(aggregation.fingerprint.analyzed_entities, vec!["s3", "iam"]);
    assert_eq!(aggregation.skipped.len(), 1);
    assert_eq!(aggregation.skipped[0].name, "broken");
    assert_eq!(aggregation.skipped[0].code, "ERR_MALFORMED_DOCUMENT");
    assert!(!aggregation.fingerprint.entity_variations.contains_key("broken"));
}

#[test]
fn test_hash_ignores_timestamp_and_entity_names() {
    let a = aggregate(
        vec![("s3", Node::from(json!({"Name": "x"})))],
        "2026-01-01T00:00:00Z",
    )
    .unwrap();
    let b = aggregate(
        vec![("sqs", Node::from(json!({"Name": "y"})))],
        "2026-06-01T00:00:00Z",
    )
    .unwrap();
    assert_eq!(a.fingerprint.schema_hash, b.fingerprint.schema_hash);
}
