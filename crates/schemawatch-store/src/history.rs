//! Timestamped fingerprint history.
//!
//! Every committed change leaves a `schema_YYYYMMDD_HHMMSS.json` copy of
//! the new fingerprint in the history directory.

use crate::atomic::atomic_write;
use crate::errors::{invalid_history, io_error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use schemawatch_core::model::AggregateFingerprint;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "schema_";
const FILE_SUFFIX: &str = ".json";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One stored history copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub path: PathBuf,
    pub recorded_at: NaiveDateTime,
    /// Same-second collision counter; 0 for the first copy of a second
    pub sequence: u32,
}

/// Directory of historical fingerprints.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    dir: PathBuf,
}

impl SnapshotHistory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for a copy recorded at `at`.
    pub fn file_name_for(at: DateTime<Utc>) -> String {
        format!("{}{}{}", FILE_PREFIX, at.format(STAMP_FORMAT), FILE_SUFFIX)
    }

    /// Write a history copy of `fingerprint` and return its path.
    ///
    /// Two copies recorded within the same second get a numeric suffix
    /// instead of overwriting each other.
    ///
    /// # Errors
    ///
    /// - `Serialization`: the fingerprint cannot be encoded
    /// - `Io`: the file cannot be written
    pub fn record(&self, fingerprint: &AggregateFingerprint, at: DateTime<Utc>) -> Result<PathBuf> {
        let mut path = self.dir.join(Self::file_name_for(at));
        let mut counter = 1;
        while path.exists() {
            path = self.dir.join(format!(
                "{}{}_{}{}",
                FILE_PREFIX,
                at.format(STAMP_FORMAT),
                counter,
                FILE_SUFFIX
            ));
            counter += 1;
        }

        let json = serde_json::to_vec_pretty(fingerprint)?;
        atomic_write(&path, &json)?;
        tracing::info!(path = %path.display(), "recorded history copy");
        Ok(path)
    }

    /// All history copies, oldest first. A missing directory is empty.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the directory exists but cannot be read.
    pub fn list(&self) -> Result<Vec<HistoryEntry>> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_history", &self.dir, e)),
        };

        let mut entries: Vec<HistoryEntry> = read_dir
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                let (recorded_at, sequence) = parse_stamp(&name)?;
                Some(HistoryEntry {
                    path: entry.path(),
                    recorded_at,
                    sequence,
                })
            })
            .collect();

        entries.sort_by_key(|e| (e.recorded_at, e.sequence));
        Ok(entries)
    }

    /// Load one history copy.
    ///
    /// # Errors
    ///
    /// - `Io`: the file cannot be read
    /// - `InvalidInput`: the file is not a fingerprint
    pub fn load(&self, entry: &HistoryEntry) -> Result<AggregateFingerprint> {
        let bytes = fs::read(&entry.path).map_err(|e| io_error("load_history", &entry.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| invalid_history(&entry.path, e))
    }

    /// Delete all but the newest `keep` copies. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns `Io` if listing or deleting fails.
    pub fn prune(&self, keep: usize) -> Result<usize> {
        let entries = self.list()?;
        let excess = entries.len().saturating_sub(keep);
        for entry in &entries[..excess] {
            fs::remove_file(&entry.path).map_err(|e| io_error("prune_history", &entry.path, e))?;
        }
        if excess > 0 {
            tracing::info!(removed = excess as u64, kept = keep as u64, "pruned history");
        }
        Ok(excess)
    }
}

/// Timestamp and collision counter encoded in a history file name, or
/// `None` for foreign files.
fn parse_stamp(file_name: &str) -> Option<(NaiveDateTime, u32)> {
    let stem = file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?;
    // YYYYMMDD_HHMMSS, optionally followed by _N
    let stamp = stem.get(..15)?;
    let sequence = match stem.get(15..)? {
        "" => 0,
        rest => {
            let digits = rest.strip_prefix('_')?;
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()?
        }
    };
    let recorded_at = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;
    Some((recorded_at, sequence))
}
