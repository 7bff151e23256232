//! Subcommand implementations
//!
//! Each command returns the process exit code on success.

use clap::Args;
use schemawatch_core::errors::ExError;
use schemawatch_engine::source::{DEFAULT_INDEX_URL, DEFAULT_TIMEOUT};
use schemawatch_engine::{DirEntitySource, EntitySource, HttpEntitySource};
use std::path::PathBuf;
use std::time::Duration;

pub mod list;
pub mod lookup;
pub mod monitor;
pub mod summarize;

pub type CommandResult = Result<i32, Box<dyn std::error::Error>>;

/// Where entity documents come from
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Catalog index URL
    #[arg(long, global = true, env = "SCHEMAWATCH_SOURCE_URL")]
    pub source_url: Option<String>,

    /// Read `<name>.json` documents from this directory instead of the network
    #[arg(long, global = true, env = "SCHEMAWATCH_CATALOG_DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// HTTP timeout per request, in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,
}

impl SourceArgs {
    /// The offline directory wins over the URL when both are given.
    pub fn build(&self) -> Result<Box<dyn EntitySource>, ExError> {
        if let Some(dir) = &self.catalog_dir {
            return Ok(Box::new(DirEntitySource::new(dir)));
        }
        let url = self.source_url.as_deref().unwrap_or(DEFAULT_INDEX_URL);
        Ok(Box::new(HttpEntitySource::new(
            url,
            Duration::from_secs(self.timeout_secs),
        )?))
    }
}
