//! schemawatch store - filesystem persistence for fingerprints
//!
//! Provides:
//! - The baseline file: the single comparison point for future runs
//! - Timestamped history copies written whenever changes are committed
//! - Atomic temp-then-rename writes for both

pub mod atomic;
pub mod baseline;
pub mod errors;
pub mod history;

// Re-export key types
pub use baseline::BaselineStore;
pub use errors::Result;
pub use history::{HistoryEntry, SnapshotHistory};
