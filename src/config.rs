//! Run configuration for the generator and the ETL pipeline.
//!
//! Components never read these defaults themselves; the binary builds a
//! config (optionally overriding paths) and hands it down.

use std::path::PathBuf;

pub const DEFAULT_RAW_PATH: &str = "data_raw/healthcare_admissions_raw.csv";
pub const DEFAULT_CLEAN_PATH: &str = "data_processed/healthcare_admissions_clean.csv";
pub const DEFAULT_AGGREGATE_PATH: &str = "data_processed/healthcare_aggregated_metrics.csv";

pub const DEFAULT_ROWS: usize = 1000;
pub const DEFAULT_SEED: u64 = 42;

/// Settings for synthetic data generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub seed: u64,
    pub output_path: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            seed: DEFAULT_SEED,
            output_path: PathBuf::from(DEFAULT_RAW_PATH),
        }
    }
}

/// Input and output locations for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub raw_path: PathBuf,
    pub clean_path: PathBuf,
    pub aggregate_path: PathBuf,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from(DEFAULT_RAW_PATH),
            clean_path: PathBuf::from(DEFAULT_CLEAN_PATH),
            aggregate_path: PathBuf::from(DEFAULT_AGGREGATE_PATH),
        }
    }
}
