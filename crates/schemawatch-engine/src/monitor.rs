//! One monitor run: list, sample, fetch, aggregate, then baseline or diff.

use crate::sample::{select, SamplePolicy};
use crate::source::EntitySource;
use chrono::Utc;
use schemawatch_core::aggregate::{FingerprintAggregator, SkippedEntity};
use schemawatch_core::diff::{compute_diff, ChangeReport, DiffPolicy};
use schemawatch_core::errors::{ExError, ExErrorKind, Result};
use schemawatch_core::model::AggregateFingerprint;
use schemawatch_core::render::{self, EXIT_OK};
use schemawatch_core::{format_timestamp, log_op_end, log_op_error, log_op_start};
use schemawatch_core_types::RunId;
use schemawatch_store::{BaselineStore, SnapshotHistory};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Explicit configuration for a run. Nothing is read from globals.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub baseline_path: PathBuf,
    /// Where dated copies go when changes are committed
    pub history_dir: PathBuf,
    pub sample: SamplePolicy,
    /// Always write a fresh baseline instead of diffing
    pub create_baseline: bool,
    /// On detected changes, record a history copy and replace the baseline
    pub commit_changes: bool,
    pub diff_policy: DiffPolicy,
}

impl MonitorConfig {
    /// Defaults with the history directory next to the baseline file.
    pub fn new(baseline_path: impl Into<PathBuf>) -> Self {
        let baseline_path = baseline_path.into();
        let history_dir = baseline_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            baseline_path,
            history_dir,
            sample: SamplePolicy::default(),
            create_baseline: false,
            commit_changes: true,
            diff_policy: DiffPolicy::default(),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonitorOutcome {
    BaselineCreated {
        run_id: String,
        /// True when no baseline existed and none was requested
        implicit: bool,
        baseline_path: String,
        current_schema: AggregateFingerprint,
        skipped: Vec<SkippedEntity>,
    },
    AnalysisComplete {
        run_id: String,
        changes: ChangeReport,
        current_schema: AggregateFingerprint,
        baseline_timestamp: String,
        current_timestamp: String,
        skipped: Vec<SkippedEntity>,
        /// Dated copy written for committed changes
        history_path: Option<String>,
        committed: bool,
    },
}

impl MonitorOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            MonitorOutcome::BaselineCreated { .. } => EXIT_OK,
            MonitorOutcome::AnalysisComplete { changes, .. } => render::exit_code(changes),
        }
    }

    pub fn report(&self) -> Option<&ChangeReport> {
        match self {
            MonitorOutcome::BaselineCreated { .. } => None,
            MonitorOutcome::AnalysisComplete { changes, .. } => Some(changes),
        }
    }

    pub fn current_schema(&self) -> &AggregateFingerprint {
        match self {
            MonitorOutcome::BaselineCreated { current_schema, .. }
            | MonitorOutcome::AnalysisComplete { current_schema, .. } => current_schema,
        }
    }

    pub fn skipped(&self) -> &[SkippedEntity] {
        match self {
            MonitorOutcome::BaselineCreated { skipped, .. }
            | MonitorOutcome::AnalysisComplete { skipped, .. } => skipped,
        }
    }
}

/// Runs the monitor against any [`EntitySource`].
pub struct Monitor {
    config: MonitorConfig,
    baseline: BaselineStore,
    history: SnapshotHistory,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        let baseline = BaselineStore::new(&config.baseline_path);
        let history = SnapshotHistory::new(&config.history_dir);
        Self {
            config,
            baseline,
            history,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Execute one run.
    ///
    /// Per-entity failures are skipped. Everything that makes the result
    /// untrustworthy is returned as an error.
    ///
    /// # Errors
    ///
    /// - `BaselineCorrupt` / `Io`: the baseline cannot be read
    /// - `ExternalService`: the catalog cannot be listed, a fetch fails for
    ///   a reason unrelated to the entity, or no sampled entity could be
    ///   analyzed
    /// - `InvalidInput`: the sample policy selected nothing while a baseline
    ///   exists to diff against
    /// - `Io` / `Serialization`: the baseline or history copy cannot be written
    pub fn run(&self, source: &dyn EntitySource) -> Result<MonitorOutcome> {
        let run_id = RunId::new();
        let started = Instant::now();
        log_op_start!(
            "monitor",
            run_id = %run_id,
            create_baseline = self.config.create_baseline
        );

        match self.run_inner(source, &run_id) {
            Ok(outcome) => {
                log_op_end!(
                    "monitor",
                    duration_ms = started.elapsed().as_millis() as u64,
                    run_id = %run_id,
                    exit_code = outcome.exit_code() as i64
                );
                Ok(outcome)
            }
            Err(err) => {
                log_op_error!(
                    "monitor",
                    err.clone(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    run_id = %run_id
                );
                Err(err)
            }
        }
    }

    fn run_inner(&self, source: &dyn EntitySource, run_id: &RunId) -> Result<MonitorOutcome> {
        let now = Utc::now();
        let timestamp = format_timestamp(now);

        // An explicit re-baseline must work even over a corrupt file
        let baseline = if self.config.create_baseline {
            None
        } else {
            self.baseline.load()?
        };
        if baseline.is_none() && !self.config.create_baseline {
            tracing::info!(
                run_id = %run_id,
                code = ExErrorKind::BaselineNotFound.code(),
                path = %self.baseline.path().display(),
                "no baseline found, this run creates one"
            );
        }

        let catalog = source.list_entities().map_err(|e| {
            ExError::new(ExErrorKind::ExternalService)
                .with_op("list_entities")
                .with_message("entity catalog could not be listed")
                .with_source(e)
        })?;
        let sample = select(&catalog, &self.config.sample);
        // An empty sample makes an empty-set baseline, but diffing it would
        // report every baseline field as removed
        if sample.is_empty() && baseline.is_some() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("select_sample")
                .with_message(format!(
                    "sample policy selected no entities from a catalog of {}; nothing to compare",
                    catalog.len()
                )));
        }
        tracing::info!(
            run_id = %run_id,
            catalog_size = catalog.len() as u64,
            sample_size = sample.len() as u64,
            "sample selected"
        );

        let mut aggregator = FingerprintAggregator::new();
        for name in &sample {
            match source.fetch_document(name) {
                Ok(document) => {
                    aggregator.add_document(name, &document);
                }
                Err(err) if err.kind().is_per_entity() => {
                    aggregator.record_failure(name, &err.with_entity(name.as_str()))
                }
                Err(err) => {
                    return Err(ExError::new(ExErrorKind::ExternalService)
                        .with_op("fetch_document")
                        .with_entity(name.as_str())
                        .with_message("entity source failed")
                        .with_source(err))
                }
            }
        }

        if !sample.is_empty() && aggregator.analyzed_count() == 0 {
            return Err(ExError::new(ExErrorKind::ExternalService)
                .with_op("aggregate")
                .with_message(format!(
                    "none of the {} sampled entities could be analyzed",
                    sample.len()
                )));
        }

        let aggregation = aggregator.finish(timestamp.clone())?;
        let mut current = aggregation.fingerprint;
        let skipped = aggregation.skipped;

        let Some(baseline) = baseline else {
            self.baseline.save(&mut current, timestamp)?;
            tracing::info!(
                run_id = %run_id,
                path = %self.baseline.path().display(),
                schema_hash = %current.schema_hash,
                "baseline created"
            );
            return Ok(MonitorOutcome::BaselineCreated {
                run_id: run_id.to_string(),
                implicit: !self.config.create_baseline,
                baseline_path: self.baseline.path().display().to_string(),
                current_schema: current,
                skipped,
            });
        };

        let changes = compute_diff(&current, &baseline, self.config.diff_policy)?;

        let mut history_path = None;
        let committed = changes.has_changes && self.config.commit_changes;
        if committed {
            let path = self.history.record(&current, now)?;
            self.baseline.save(&mut current, timestamp)?;
            history_path = Some(path.display().to_string());
        }

        Ok(MonitorOutcome::AnalysisComplete {
            run_id: run_id.to_string(),
            changes,
            baseline_timestamp: baseline.timestamp,
            current_timestamp: current.timestamp.clone(),
            current_schema: current,
            skipped,
            history_path,
            committed,
        })
    }
}
