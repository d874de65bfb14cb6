//! Ingest → clean → aggregate → write, run once with no retries.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::EtlConfig;
use crate::error::Result;
use crate::ingest::ingest;
use crate::observe::EtlObserver;
use crate::output::write_outputs;
use crate::transform::{CleaningReport, aggregate, clean};

/// What one pipeline run did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub raw_path: PathBuf,
    pub clean_path: PathBuf,
    pub aggregate_path: PathBuf,
    pub rows_loaded: usize,
    pub rows_cleaned: usize,
    pub groups: usize,
    pub cleaning: CleaningReport,
}

/// Runs the full pipeline for `config`.
///
/// Any stage failure aborts the run. Nothing is written unless ingest,
/// cleaning, and aggregation all succeed.
#[tracing::instrument(skip(observer), fields(input = %config.raw_path.display()))]
pub fn run_etl(config: &EtlConfig, observer: &dyn EtlObserver) -> Result<RunSummary> {
    let raw = ingest(&config.raw_path, observer)?;
    let rows_loaded = raw.len();

    let (cleaned, cleaning) = clean(raw, observer)?;
    let aggregates = aggregate(&cleaned, observer);

    write_outputs(
        &cleaned,
        &aggregates,
        &config.clean_path,
        &config.aggregate_path,
        observer,
    )?;

    Ok(RunSummary {
        raw_path: config.raw_path.clone(),
        clean_path: config.clean_path.clone(),
        aggregate_path: config.aggregate_path.clone(),
        rows_loaded,
        rows_cleaned: cleaned.len(),
        groups: aggregates.len(),
        cleaning,
    })
}
