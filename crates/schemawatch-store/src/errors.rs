//! Error handling for schemawatch-store
//!
//! Wraps schemawatch-core ExError with store-specific helpers

use schemawatch_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a corrupt-baseline error
pub fn baseline_corrupt(path: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::BaselineCorrupt)
        .with_op("load_baseline")
        .with_path(path.display().to_string())
        .with_message(format!("baseline is not a valid fingerprint: {}", reason))
}

/// Create an invalid history entry error
pub fn invalid_history(path: &Path, reason: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("load_history")
        .with_path(path.display().to_string())
        .with_message(reason.to_string())
}
