//! schemawatch CLI
//!
//! Command-line interface for catalog exploration and schema monitoring

use clap::{Parser, Subcommand, ValueEnum};
use schemawatch_core::logging_facility::{self, Profile};
use schemawatch_core::errors::ExError;
use schemawatch_core::render::{exit_code_for_error, EXIT_FAILURE};

mod commands;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "schemawatch")]
#[command(
    about = "schemawatch - Explore a service-metadata catalog and watch its structure for changes",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    source: commands::SourceArgs,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fingerprint a sample of the catalog and compare it to the baseline
    Monitor(commands::monitor::MonitorArgs),
    /// Render a Markdown change summary from `monitor --output-format json` output
    Summarize(commands::summarize::SummarizeArgs),
    /// List catalog entity names
    List(commands::list::ListArgs),
    /// Look up actions, resources and context keys of one entity
    Lookup(commands::lookup::LookupArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Monitor(args) => commands::monitor::execute(&cli.source, args),
        Commands::Summarize(args) => commands::summarize::execute(args),
        Commands::List(args) => commands::list::execute(&cli.source, args),
        Commands::Lookup(args) => commands::lookup::execute(&cli.source, args),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            let code = e
                .downcast_ref::<ExError>()
                .map_or(EXIT_FAILURE, exit_code_for_error);
            std::process::exit(code);
        }
    }
}
