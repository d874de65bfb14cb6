//! CLI entry point for the admissions ETL.
//!
//! `generate` writes a synthetic raw admissions file; `etl` cleans it,
//! aggregates it per hospital unit and condition, and writes both tables.

use admissions_etl::config::{EtlConfig, GeneratorConfig};
use admissions_etl::generator::run_generator;
use admissions_etl::observe::TracingObserver;
use admissions_etl::output::print_json;
use admissions_etl::pipeline::run_etl;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "admissions_etl")]
#[command(about = "Batch ETL for synthetic hospital admissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic raw admissions CSV
    Generate {
        /// Number of admissions to generate
        #[arg(short, long)]
        rows: Option<usize>,

        /// Random seed; the same seed always yields the same file
        #[arg(short, long)]
        seed: Option<u64>,

        /// Where to write the raw CSV
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Clean, aggregate, and write the raw admissions CSV
    Etl {
        /// Raw CSV to read
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Where to write the cleaned table
        #[arg(long, value_name = "FILE")]
        clean_output: Option<PathBuf>,

        /// Where to write the aggregated metrics
        #[arg(long, value_name = "FILE")]
        aggregate_output: Option<PathBuf>,
    },
}

/// Colored stderr plus a JSON daily-rolling log file.
fn init_tracing() -> WorkerGuard {
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/admissions_etl.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("admissions_etl.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

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

    guard
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();
    let cli = Cli::parse();
    let observer = TracingObserver;

    match cli.command {
        Commands::Generate { rows, seed, output } => {
            let defaults = GeneratorConfig::default();
            let config = GeneratorConfig {
                rows: rows.unwrap_or(defaults.rows),
                seed: seed.unwrap_or(defaults.seed),
                output_path: output.unwrap_or(defaults.output_path),
            };

            run_generator(&config, &observer)?;
            info!(path = %config.output_path.display(), rows = config.rows, "Generation complete");
        }
        Commands::Etl {
            input,
            clean_output,
            aggregate_output,
        } => {
            let defaults = EtlConfig::default();
            let config = EtlConfig {
                raw_path: input.unwrap_or(defaults.raw_path),
                clean_path: clean_output.unwrap_or(defaults.clean_path),
                aggregate_path: aggregate_output.unwrap_or(defaults.aggregate_path),
            };

            let summary = run_etl(&config, &observer)?;
            print_json(&summary)?;
            info!("Load step completed");
        }
    }

    Ok(())
}
