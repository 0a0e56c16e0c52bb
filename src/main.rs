//! CLI entry point for the state prevalence tool.
//!
//! Provides subcommands for summarizing behavioral-risk survey microdata
//! into per-state weighted prevalence tables, processing cancer-registry
//! exports, and merging the two summaries into one combined table.

use anyhow::Result;
use clap::{Parser, Subcommand};
use state_prevalence::{
    merge::merge_summaries,
    output::{print_json, write_summary, write_table},
    registry,
    summary::{SummarizeOptions, summarize},
    table::Table,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "state_prevalence")]
#[command(about = "Per-state summary tables from public health survey extracts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute state-level weighted prevalence from survey microdata
    Summarize {
        /// Path to the survey microdata CSV
        #[arg(value_name = "SURVEY_CSV")]
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "data/processed/survey_state_summary.csv")]
        output: PathBuf,

        /// Compute colonoscopy/sigmoidoscopy prevalence if present
        #[arg(long, default_value_t = false)]
        include_colonoscopy: bool,

        /// Explicit weight column name (e.g., _LLCPWT or X_LLCPWT)
        #[arg(short = 'w', long)]
        weight_column: Option<String>,

        /// Comma-separated columns whose absence aborts the run
        #[arg(long, value_delimiter = ',', default_value = "_STATE,_BMI5")]
        required_columns: Vec<String>,
    },
    /// Process a cancer-registry export into state-year and state summaries
    Registry {
        /// Path to the registry export (.csv or .txt)
        #[arg(value_name = "EXPORT_FILE")]
        input: PathBuf,

        /// Output CSV: state-year tidy table
        #[arg(long, default_value = "data/processed/registry_state_year.csv")]
        out_state_year: PathBuf,

        /// Output CSV: state summary (single year or mean across years)
        #[arg(long, default_value = "data/processed/registry_state_summary.csv")]
        out_state: PathBuf,

        /// If set (e.g., 2022), produce the state summary for that year only
        #[arg(short, long)]
        year: Option<i32>,

        /// Exclude territories from outputs
        #[arg(long, default_value_t = false)]
        exclude_territories: bool,
    },
    /// Merge the survey and registry state summaries into one table
    Merge {
        /// Path to the survey state summary CSV
        #[arg(long)]
        survey: PathBuf,

        /// Path to the registry state summary CSV
        #[arg(long)]
        registry: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "data/processed/combined_state_summary.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/state_prevalence.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("state_prevalence.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            input,
            output,
            include_colonoscopy,
            weight_column,
            required_columns,
        } => {
            info!(input = %input.display(), "Loading survey microdata");
            let table = Table::from_path(&input)?;
            info!(rows = table.len(), "Rows read");

            let options = SummarizeOptions {
                weight_override: weight_column,
                include_colonoscopy,
                required_columns,
            };
            let summary = summarize(&table, &options)?;

            write_summary(&output, &summary)?;
            print_json(&summary.rows.iter().take(10).collect::<Vec<_>>())?;
        }
        Commands::Registry {
            input,
            out_state_year,
            out_state,
            year,
            exclude_territories,
        } => {
            info!(input = %input.display(), "Reading registry export");
            let table = registry::read_export(&input)?;
            info!(rows = table.len(), "Rows read");

            let records = registry::filter_colon(registry::normalize(&table)?);
            info!(rows = records.len(), "Colon & Rectum rows");

            let options = registry::RegistryOptions {
                year,
                exclude_territories,
            };
            let (state_year, state_summary) = registry::summarize(&records, &options);

            registry::write_state_year(&out_state_year, &state_year)?;
            registry::write_state_summary(&out_state, &state_summary)?;
            print_json(&state_summary.iter().take(10).collect::<Vec<_>>())?;
        }
        Commands::Merge {
            survey,
            registry,
            output,
        } => {
            info!(survey = %survey.display(), registry = %registry.display(), "Merging state summaries");
            let survey_table = Table::from_path(&survey)?;
            let registry_table = Table::from_path(&registry)?;

            let merged = merge_summaries(&survey_table, &registry_table)?;
            write_table(&output, merged.headers(), merged.rows())?;
            info!(path = %output.display(), rows = merged.len(), "Saved combined summary");
        }
    }

    Ok(())
}
