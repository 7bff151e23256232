//! Fingerprint aggregation.
//!
//! Folds per-entity fragments into one [`AggregateFingerprint`]. The fold is
//! commutative and associative over every set field, so retrieval order and
//! concurrency never change the result. Per-entity failures are recorded
//! and logged here and never propagate further.

use crate::errors::{ExError, Result};
use crate::extract::extract;
use crate::model::document::Node;
use crate::model::fingerprint::AggregateFingerprint;
use crate::model::fragment::StructureFragment;
use crate::{log_entity_skip, log_op_end, log_op_start};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// An entity that was selected but could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntity {
    pub name: String,
    /// Stable error code (e.g. `ERR_MALFORMED_DOCUMENT`)
    pub code: String,
    pub message: String,
}

/// Result of a fold: the fingerprint plus what was left out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub fingerprint: AggregateFingerprint,
    pub skipped: Vec<SkippedEntity>,
}

/// Incremental fold over sampled entities.
#[derive(Debug, Clone, Default)]
pub struct FingerprintAggregator {
    analyzed: Vec<String>,
    structure: StructureFragment,
    variations: BTreeMap<String, StructureFragment>,
    skipped: Vec<SkippedEntity>,
}

impl FingerprintAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an already extracted fragment. A name seen before is ignored.
    pub fn add_fragment(&mut self, name: impl Into<String>, fragment: StructureFragment) {
        let name = name.into();
        if self.variations.contains_key(&name) {
            tracing::debug!(entity = %name, "entity already analyzed, ignoring repeat");
            return;
        }
        self.structure.merge(&fragment);
        self.analyzed.push(name.clone());
        self.variations.insert(name, fragment);
    }

    /// Extract and add one document. Returns `false` when the entity was skipped.
    pub fn add_document(&mut self, name: &str, document: &Node) -> bool {
        match extract(document) {
            Ok(fragment) => {
                self.add_fragment(name, fragment);
                true
            }
            Err(err) => {
                self.record_failure(name, &err.with_entity(name));
                false
            }
        }
    }

    /// Record an entity that could not be fetched or parsed.
    pub fn record_failure(&mut self, name: &str, err: &ExError) {
        log_entity_skip!("aggregate", name, err);
        self.skipped.push(SkippedEntity {
            name: name.to_string(),
            code: err.code().to_string(),
            message: err.message().to_string(),
        });
    }

    /// Combine two partial folds. `other`'s entities are appended after ours.
    pub fn merge(mut self, other: FingerprintAggregator) -> Self {
        for name in other.analyzed {
            if let Some(fragment) = other.variations.get(&name) {
                self.add_fragment(name.clone(), fragment.clone());
            }
        }
        self.skipped.extend(other.skipped);
        self
    }

    pub fn analyzed_count(&self) -> usize {
        self.analyzed.len()
    }

    pub fn skipped(&self) -> &[SkippedEntity] {
        &self.skipped
    }

    /// Finish the fold and compute the content hash.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the structure cannot be hashed.
    pub fn finish(self, timestamp: impl Into<String>) -> Result<Aggregation> {
        let fingerprint = AggregateFingerprint::new(
            self.analyzed,
            self.structure,
            self.variations,
            timestamp,
        )?;
        Ok(Aggregation {
            fingerprint,
            skipped: self.skipped,
        })
    }
}

/// Aggregate a sample of `(name, document)` pairs.
///
/// Malformed documents are skipped. An empty sample yields empty sets.
///
/// # Errors
///
/// Returns `Serialization` if the resulting structure cannot be hashed.
pub fn aggregate<I, S>(sample: I, timestamp: impl Into<String>) -> Result<Aggregation>
where
    I: IntoIterator<Item = (S, Node)>,
    S: AsRef<str>,
{
    let started = Instant::now();
    log_op_start!("aggregate");

    let mut aggregator = FingerprintAggregator::new();
    for (name, document) in sample {
        aggregator.add_document(name.as_ref(), &document);
    }
    let aggregation = aggregator.finish(timestamp)?;

    log_op_end!(
        "aggregate",
        duration_ms = started.elapsed().as_millis() as u64,
        analyzed = aggregation.fingerprint.analyzed_entities.len() as u64,
        skipped = aggregation.skipped.len() as u64
    );
    Ok(aggregation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_sample_yields_empty_sets() {
        let aggregation = aggregate(Vec::<(String, Node)>::new(), "t").unwrap();
        assert!(aggregation.fingerprint.structure.is_empty());
        assert!(aggregation.fingerprint.analyzed_entities.is_empty());
        assert!(aggregation.skipped.is_empty());
    }

    #[test]
    fn test_repeated_entity_counted_once() {
        let mut agg = FingerprintAggregator::new();
        let doc = Node::from(json!({"Name": "s3"}));
        assert!(agg.add_document("s3", &doc));
        assert!(agg.add_document("s3", &doc));
        assert_eq!(agg.analyzed_count(), 1);
    }

    #[test]
    fn test_malformed_document_is_skipped() {
        let mut agg = FingerprintAggregator::new();
        assert!(!agg.add_document("broken", &Node::from(json!("text"))));
        assert_eq!(agg.analyzed_count(), 0);
        assert_eq!(agg.skipped()[0].code, "ERR_MALFORMED_DOCUMENT");
        assert_eq!(agg.skipped()[0].name, "broken");
    }

    #[test]
    fn test_merge_matches_single_fold() {
        let docs = [
            ("a", json!({"Name": "a", "Actions": [{"Name": "Get"}]})),
            ("b", json!({"Name": "b", "Version": "1"})),
        ];

        let mut whole = FingerprintAggregator::new();
        for (name, doc) in &docs {
            whole.add_document(name, &Node::from(doc.clone()));
        }

        let mut left = FingerprintAggregator::new();
        left.add_document(docs[0].0, &Node::from(docs[0].1.clone()));
        let mut right = FingerprintAggregator::new();
        right.add_document(docs[1].0, &Node::from(docs[1].1.clone()));

        let merged = left.merge(right).finish("t").unwrap();
        let single = whole.finish("t").unwrap();
        assert_eq!(merged, single);
    }
}
