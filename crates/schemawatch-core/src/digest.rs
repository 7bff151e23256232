//! Content hashing for fingerprints.
//!
//! The hash covers only the unioned structure sets. `analyzed_entities`,
//! `entity_variations` and `timestamp` are excluded, so two fingerprints with
//! identical sets hash identically regardless of which entities were sampled
//! or in which order.
//!
//! Canonical form: the `StructureFragment` serialized as compact JSON. Every
//! set is a `BTreeSet`, so members serialize in lexicographic order and the
//! field order is fixed by the struct.

use crate::errors::Result;
use crate::model::fragment::StructureFragment;
use sha2::{Digest, Sha256};

/// Compute the SHA256 digest of a structure's canonical serialization.
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Errors
///
/// Returns `Serialization` if JSON serialization fails.
///
/// ## Example
///
/// ```
/// use schemawatch_core::digest::compute_structure_digest;
/// use schemawatch_core::model::StructureFragment;
///
/// let digest = compute_structure_digest(&StructureFragment::default()).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
pub fn compute_structure_digest(structure: &StructureFragment) -> Result<String> {
    let canonical = serde_json::to_string(structure)?;
    Ok(hash_string(&canonical))
}

fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
