//! Monitor command

use super::{CommandResult, SourceArgs};
use clap::{Args, ValueEnum};
use schemawatch_core::diff::DiffPolicy;
use schemawatch_core::render::{render, OutputFormat};
use schemawatch_engine::sample::DEFAULT_SAMPLE_SIZE;
use schemawatch_engine::{Monitor, MonitorConfig, MonitorOutcome, SamplePolicy};
use schemawatch_store::baseline::DEFAULT_BASELINE_FILE;
use schemawatch_store::SnapshotHistory;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Text,
    Json,
    Markdown,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Write a fresh baseline instead of comparing
    #[arg(long)]
    pub create_baseline: bool,

    /// Number of entities to sample at random
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Analyze exactly these entities (repeatable)
    #[arg(long = "entity", value_name = "NAME", conflicts_with = "all")]
    pub entities: Vec<String>,

    /// Analyze the whole catalog
    #[arg(long)]
    pub all: bool,

    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormatArg,

    /// Baseline file
    #[arg(long, env = "SCHEMAWATCH_BASELINE", default_value = DEFAULT_BASELINE_FILE)]
    pub baseline: PathBuf,

    /// Directory for dated history copies (defaults to the baseline's directory)
    #[arg(long, env = "SCHEMAWATCH_HISTORY_DIR")]
    pub history_dir: Option<PathBuf>,

    /// Report changes without updating the baseline
    #[arg(long)]
    pub no_commit: bool,

    /// Treat new field combinations as changes
    #[arg(long)]
    pub alert_on_new_combinations: bool,

    /// After committing, keep only this many history copies
    #[arg(long, value_name = "N")]
    pub keep_history: Option<usize>,
}

impl MonitorArgs {
    fn sample_policy(&self) -> SamplePolicy {
        if self.all {
            SamplePolicy::All
        } else if !self.entities.is_empty() {
            SamplePolicy::Fixed(self.entities.clone())
        } else {
            SamplePolicy::Random {
                size: self.sample_size,
                seed: self.seed,
            }
        }
    }

    fn config(&self) -> MonitorConfig {
        let mut config = MonitorConfig::new(&self.baseline);
        if let Some(dir) = &self.history_dir {
            config.history_dir = dir.clone();
        }
        config.sample = self.sample_policy();
        config.create_baseline = self.create_baseline;
        config.commit_changes = !self.no_commit;
        config.diff_policy = DiffPolicy {
            alert_on_new_combinations: self.alert_on_new_combinations,
        };
        config
    }
}

pub fn execute(source_args: &SourceArgs, args: MonitorArgs) -> CommandResult {
    let source = source_args.build()?;
    let monitor = Monitor::new(args.config());
    let outcome = monitor.run(source.as_ref())?;

    if let (Some(keep), MonitorOutcome::AnalysisComplete { committed: true, .. }) =
        (args.keep_history, &outcome)
    {
        SnapshotHistory::new(&monitor.config().history_dir).prune(keep)?;
    }

    let format = OutputFormat::from(args.output_format);
    print!("{}", render_outcome(&outcome, format)?);
    Ok(outcome.exit_code())
}

fn render_outcome(
    outcome: &MonitorOutcome,
    format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    if format == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(outcome)?));
    }

    let mut out = match outcome {
        MonitorOutcome::BaselineCreated {
            baseline_path,
            current_schema,
            ..
        } => format!(
            "Baseline created at {} from {} entities (schema_hash {})\n",
            baseline_path,
            current_schema.analyzed_entities.len(),
            current_schema.schema_hash
        ),
        MonitorOutcome::AnalysisComplete {
            changes,
            history_path,
            ..
        } => {
            let mut text = render(changes, format)?;
            if let (OutputFormat::Text, Some(path)) = (format, history_path) {
                text.push_str(&format!("Baseline updated; snapshot written to {}\n", path));
            }
            text
        }
    };

    if format == OutputFormat::Text && !outcome.skipped().is_empty() {
        out.push_str(&format!("\nSkipped {} entities:\n", outcome.skipped().len()));
        for skipped in outcome.skipped() {
            out.push_str(&format!("  {} [{}] {}\n", skipped.name, skipped.code, skipped.message));
        }
    }
    Ok(out)
}
