//! The baseline file.
//!
//! The baseline path is explicit configuration handed to [`BaselineStore`];
//! nothing in the workspace assumes a fixed location.

use crate::atomic::atomic_write;
use crate::errors::{baseline_corrupt, io_error, Result};
use schemawatch_core::model::AggregateFingerprint;
use schemawatch_core::{log_op_end, log_op_start};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Default baseline file name, relative to the working directory.
pub const DEFAULT_BASELINE_FILE: &str = "service_reference_baseline.json";

/// Reads and replaces the persisted baseline fingerprint.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load the baseline. `Ok(None)` when no baseline file exists.
    ///
    /// A `schema_hash` that disagrees with the stored structure is logged
    /// as a warning and the baseline is still used.
    ///
    /// # Errors
    ///
    /// - `BaselineCorrupt`: the file exists but is not a valid fingerprint
    /// - `Io`: the file exists but cannot be read
    pub fn load(&self) -> Result<Option<AggregateFingerprint>> {
        let started = Instant::now();
        log_op_start!("load_baseline", path = %self.path.display());

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no baseline found");
                return Ok(None);
            }
            Err(e) => return Err(io_error("load_baseline", &self.path, e)),
        };

        let fingerprint: AggregateFingerprint =
            serde_json::from_slice(&bytes).map_err(|e| baseline_corrupt(&self.path, e))?;

        if !fingerprint.hash_matches() {
            tracing::warn!(
                path = %self.path.display(),
                schema_hash = %fingerprint.schema_hash,
                "baseline schema_hash does not match its contents"
            );
        }

        log_op_end!(
            "load_baseline",
            duration_ms = started.elapsed().as_millis() as u64,
            analyzed = fingerprint.analyzed_entities.len() as u64
        );
        Ok(Some(fingerprint))
    }

    /// Stamp `fingerprint` with `timestamp` and a fresh `schema_hash`, then
    /// replace the baseline with it atomically.
    ///
    /// # Errors
    ///
    /// - `Serialization`: the fingerprint cannot be encoded
    /// - `Io`: the file cannot be written
    pub fn save(
        &self,
        fingerprint: &mut AggregateFingerprint,
        timestamp: impl Into<String>,
    ) -> Result<()> {
        let started = Instant::now();
        log_op_start!("save_baseline", path = %self.path.display());

        fingerprint.stamp(timestamp)?;
        let json = serde_json::to_vec_pretty(fingerprint)?;
        atomic_write(&self.path, &json)?;

        log_op_end!(
            "save_baseline",
            duration_ms = started.elapsed().as_millis() as u64,
            schema_hash = %fingerprint.schema_hash
        );
        Ok(())
    }
}
