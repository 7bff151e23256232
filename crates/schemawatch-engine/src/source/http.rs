//! HTTP catalog source.
//!
//! The index URL returns `[{"service": name, "url": document_url}, ...]`;
//! each document URL returns one entity document. The index is fetched at
//! most once per source.

use super::{EntitySource, SourceError};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use schemawatch_core::errors::{ExError, ExErrorKind};
use schemawatch_core::model::Node;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_INDEX_URL: &str = "https://servicereference.us-east-1.amazonaws.com/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct IndexEntry {
    service: String,
    url: String,
}

pub struct HttpEntitySource {
    index_url: String,
    client: Client,
    index: OnceLock<BTreeMap<String, String>>,
}

impl HttpEntitySource {
    /// # Errors
    ///
    /// Returns `Internal` if the HTTP client cannot be built.
    pub fn new(index_url: impl Into<String>, timeout: Duration) -> Result<Self, ExError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("schemawatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("http_client")
                    .with_message(e.to_string())
            })?;
        Ok(Self {
            index_url: index_url.into(),
            client,
            index: OnceLock::new(),
        })
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    fn index(&self) -> Result<&BTreeMap<String, String>, SourceError> {
        if let Some(index) = self.index.get() {
            return Ok(index);
        }
        let fetched = self.fetch_index()?;
        Ok(self.index.get_or_init(|| fetched))
    }

    fn fetch_index(&self) -> Result<BTreeMap<String, String>, SourceError> {
        let unavailable = |reason: String| SourceError::IndexUnavailable { reason };

        let resp = self
            .client
            .get(&self.index_url)
            .send()
            .map_err(|e| unavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(unavailable(format!(
                "HTTP {} fetching {}",
                resp.status(),
                self.index_url
            )));
        }
        let bytes = resp.bytes().map_err(|e| unavailable(e.to_string()))?;
        let entries: Vec<IndexEntry> =
            serde_json::from_slice(&bytes).map_err(|e| unavailable(e.to_string()))?;

        tracing::debug!(entities = entries.len() as u64, "fetched catalog index");
        Ok(entries.into_iter().map(|e| (e.service, e.url)).collect())
    }

    fn get_document(&self, name: &str, url: &str) -> Result<Node, SourceError> {
        let failed = |reason: String| SourceError::FetchFailed {
            name: name.to_string(),
            reason,
        };
        let map_send = |e: reqwest::Error| {
            if e.is_timeout() {
                SourceError::Timeout {
                    name: name.to_string(),
                }
            } else {
                failed(e.to_string())
            }
        };

        let resp = self.client.get(url).send().map_err(map_send)?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(failed(format!("HTTP {} fetching {}", status, url)));
        }
        let bytes = resp.bytes().map_err(map_send)?;
        Node::from_slice(&bytes).map_err(|e| SourceError::InvalidDocument {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl EntitySource for HttpEntitySource {
    fn list_entities(&self) -> Result<Vec<String>, ExError> {
        Ok(self.index()?.keys().cloned().collect())
    }

    fn fetch_document(&self, name: &str) -> Result<Node, ExError> {
        let url = self
            .index()?
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
            })?;
        Ok(self.get_document(name, &url)?)
    }
}
