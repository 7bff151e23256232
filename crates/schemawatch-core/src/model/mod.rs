//! Domain model: raw documents, per-entity fragments and aggregate fingerprints.

pub mod document;
pub mod fingerprint;
pub mod fragment;

pub use document::{Node, Scalar};
pub use fingerprint::AggregateFingerprint;
pub use fragment::{Category, CombinationContext, FieldCombination, StructureFragment};
