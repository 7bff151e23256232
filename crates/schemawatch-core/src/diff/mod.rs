//! Fingerprint diff engine.
//!
//! Compares a freshly aggregated fingerprint against the stored baseline and
//! produces a structured, deterministic [`ChangeReport`].
//!
//! ## Entry point
//!
//! ```ignore
//! use schemawatch_core::diff::{compute_diff, DiffPolicy};
//!
//! let report = compute_diff(&current, &baseline, DiffPolicy::default())?;
//! let text = schemawatch_core::diff::human_summary::render_text_report(&report);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce byte-identical serialized reports.
//! - **Idempotence**: diffing a fingerprint against itself reports no changes.
//! - **Sampling-noise suppression**: removed field combinations never alert.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, DiffPolicy};
pub use human_summary::{render_markdown_summary, render_text_report};
pub use model::{ChangeClassification, ChangeReport, ReportIdentity};
