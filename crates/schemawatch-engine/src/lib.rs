//! schemawatch engine - sources, sampling and the monitor run
//!
//! Wires the pure core to its collaborators:
//! - `source`: where entity documents come from (HTTP catalog, directory, memory)
//! - `sample`: which entities a run looks at
//! - `monitor`: one baseline-or-diff run from listing to exit code
//! - `catalog`: read-only lookups over a single entity document

pub mod catalog;
pub mod monitor;
pub mod sample;
pub mod source;

pub use catalog::{EntityDocument, EntitySummary, ResourceDetail};
pub use monitor::{Monitor, MonitorConfig, MonitorOutcome};
pub use sample::{select, SamplePolicy};
pub use source::{DirEntitySource, EntitySource, HttpEntitySource, InMemorySource, SourceError};
