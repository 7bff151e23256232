//! Core types shared across schemawatch crates
//!
//! - **Correlation types**: RunId for tying together the log events of one
//!   monitor invocation
//! - **Schema constants**: Canonical event names emitted by the logging macros

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
