//! schemawatch core - structural fingerprinting and differencing
//!
//! This crate reduces loosely-typed entity metadata documents to structural
//! fingerprints and compares fingerprints over time:
//! - Tagged-union document model with total accessors
//! - Structure extraction over the four tracked levels
//! - Commutative fingerprint aggregation with an order-independent content hash
//! - Set-based differ with a configurable alerting policy
//! - Text / JSON / Markdown rendering and exit-code mapping

pub mod aggregate;
pub mod diff;
pub mod digest;
pub mod errors;
pub mod extract;
pub mod logging_facility;
pub mod model;
pub mod render;

pub use schemawatch_core_types::schema;

// Re-export commonly used types
pub use aggregate::{aggregate, Aggregation, FingerprintAggregator, SkippedEntity};
pub use diff::{compute_diff, ChangeReport, DiffPolicy};
pub use errors::{ExError, ExErrorKind, Result};
pub use extract::extract;
pub use model::{AggregateFingerprint, Category, Node, StructureFragment};
pub use render::{exit_code, render, OutputFormat};

/// RFC 3339 with second precision, the form stored in fingerprints.
pub fn format_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_truncates_to_seconds() {
        let at = chrono::DateTime::parse_from_rfc3339("2026-01-02T03:04:05.678Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        assert_eq!(format_timestamp(at), "2026-01-02T03:04:05Z");
    }
}
