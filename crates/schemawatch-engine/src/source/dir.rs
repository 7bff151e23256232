//! Offline source backed by a directory of `<name>.json` files.

use super::{EntitySource, SourceError};
use schemawatch_core::errors::ExError;
use schemawatch_core::model::Node;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DOCUMENT_EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct DirEntitySource {
    dir: PathBuf,
}

impl DirEntitySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, name: &str) -> Option<PathBuf> {
        // entity names never contain path components
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.dir.join(format!("{}.{}", name, DOCUMENT_EXTENSION)))
    }
}

impl EntitySource for DirEntitySource {
    fn list_entities(&self) -> Result<Vec<String>, ExError> {
        let read_dir = fs::read_dir(&self.dir).map_err(|e| SourceError::IndexUnavailable {
            reason: format!("{}: {}", self.dir.display(), e),
        })?;

        let mut names: Vec<String> = read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION)
            })
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    fn fetch_document(&self, name: &str) -> Result<Node, ExError> {
        let path = self.document_path(name).ok_or_else(|| SourceError::NotFound {
            name: name.to_string(),
        })?;

        let bytes = fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound {
                name: name.to_string(),
            },
            _ => SourceError::FetchFailed {
                name: name.to_string(),
                reason: format!("{}: {}", path.display(), e),
            },
        })?;

        Ok(Node::from_slice(&bytes).map_err(|e| SourceError::InvalidDocument {
            name: name.to_string(),
            reason: e.to_string(),
        })?)
    }
}
