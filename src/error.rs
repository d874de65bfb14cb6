//! Error taxonomy for the generator and the ETL pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected header: expected {expected:?}, found {found:?}")]
    Schema {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("line {line}: cannot parse {column} value {value:?} as a date")]
    DateParse {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("invalid sampling parameters: {0}")]
    Distribution(String),

    #[error("cannot impute total_cost_usd: no non-null costs remain after deduplication")]
    NoCostObservations,
}

pub type Result<T> = std::result::Result<T, EtlError>;
