//! In-memory source for tests and embedding.

use super::{EntitySource, SourceError};
use schemawatch_core::errors::ExError;
use schemawatch_core::model::Node;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    documents: BTreeMap<String, Value>,
    failing: BTreeSet<String>,
    outages: BTreeSet<String>,
    index_unavailable: bool,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, name: impl Into<String>, document: Value) -> Self {
        self.documents.insert(name.into(), document);
        self
    }

    /// List `name` in the catalog but fail every fetch of it.
    pub fn with_failure(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// List `name` but answer its fetch as if the whole source were down.
    pub fn with_outage(mut self, name: impl Into<String>) -> Self {
        self.outages.insert(name.into());
        self
    }

    /// Make `list_entities` fail.
    pub fn with_unavailable_index(mut self) -> Self {
        self.index_unavailable = true;
        self
    }
}

impl EntitySource for InMemorySource {
    fn list_entities(&self) -> Result<Vec<String>, ExError> {
        if self.index_unavailable {
            return Err(SourceError::IndexUnavailable {
                reason: "index disabled".to_string(),
            }
            .into());
        }
        let names: BTreeSet<&String> = self
            .documents
            .keys()
            .chain(&self.failing)
            .chain(&self.outages)
            .collect();
        Ok(names.into_iter().cloned().collect())
    }

    fn fetch_document(&self, name: &str) -> Result<Node, ExError> {
        if self.outages.contains(name) {
            return Err(SourceError::IndexUnavailable {
                reason: "source went away".to_string(),
            }
            .into());
        }
        if self.failing.contains(name) {
            return Err(SourceError::FetchFailed {
                name: name.to_string(),
                reason: "simulated failure".to_string(),
            }
            .into());
        }
        self.documents
            .get(name)
            .map(|doc| Node::from(doc.clone()))
            .ok_or_else(|| {
                SourceError::NotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }
}
