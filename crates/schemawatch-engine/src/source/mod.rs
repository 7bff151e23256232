//! Entity sources.
//!
//! An [`EntitySource`] lists the catalog and fetches one document per
//! entity. Sources report failures as [`SourceError`]; callers receive them
//! converted to `ExError` so the rest of the workspace sees one error type.

mod dir;
mod http;
mod memory;

pub use dir::DirEntitySource;
pub use http::{HttpEntitySource, DEFAULT_INDEX_URL, DEFAULT_TIMEOUT};
pub use memory::InMemorySource;

use schemawatch_core::errors::{ExError, ExErrorKind};
use schemawatch_core::model::Node;
use thiserror::Error;

/// Capability to enumerate and fetch entity documents.
pub trait EntitySource {
    /// All entity names in the catalog, sorted.
    ///
    /// # Errors
    ///
    /// Returns `ExternalService` if the catalog cannot be listed.
    fn list_entities(&self) -> Result<Vec<String>, ExError>;

    /// Fetch one entity document.
    ///
    /// # Errors
    ///
    /// - `EntityNotFound`: the name is not in the catalog
    /// - `EntityFetchFailure` / `Timeout`: retrieval failed
    /// - `MalformedDocument`: the payload is not JSON
    fn fetch_document(&self, name: &str) -> Result<Node, ExError>;
}

/// Source-level failures
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("catalog index unavailable: {reason}")]
    IndexUnavailable { reason: String },

    #[error("entity not found: {name}")]
    NotFound { name: String },

    #[error("request for {name} timed out")]
    Timeout { name: String },

    #[error("failed to fetch {name}: {reason}")]
    FetchFailed { name: String, reason: String },

    #[error("document for {name} is not valid JSON: {reason}")]
    InvalidDocument { name: String, reason: String },
}

impl From<SourceError> for ExError {
    fn from(err: SourceError) -> Self {
        let message = err.to_string();
        match err {
            SourceError::IndexUnavailable { .. } => ExError::new(ExErrorKind::ExternalService)
                .with_op("list_entities")
                .with_message(message),
            SourceError::NotFound { name } => ExError::new(ExErrorKind::EntityNotFound)
                .with_op("fetch_document")
                .with_entity(name)
                .with_message(message),
            SourceError::Timeout { name } => ExError::new(ExErrorKind::Timeout)
                .with_op("fetch_document")
                .with_entity(name)
                .with_message(message),
            SourceError::FetchFailed { name, .. } => ExError::new(ExErrorKind::EntityFetchFailure)
                .with_op("fetch_document")
                .with_entity(name)
                .with_message(message),
            SourceError::InvalidDocument { name, .. } => {
                ExError::new(ExErrorKind::MalformedDocument)
                    .with_op("fetch_document")
                    .with_entity(name)
                    .with_message(message)
            }
        }
    }
}
