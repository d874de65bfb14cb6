//! Column layouts of the raw, cleaned, and aggregated files.

use csv::StringRecord;

use crate::error::{EtlError, Result};

pub const RAW_COLUMNS: [&str; 11] = [
    "patient_id",
    "age",
    "gender",
    "primary_condition",
    "admission_type",
    "length_of_stay_days",
    "admission_date",
    "discharge_date",
    "readmitted_30d",
    "total_cost_usd",
    "hospital_unit",
];

pub const DERIVED_COLUMNS: [&str; 3] = ["year", "month", "is_elderly"];

pub const AGGREGATE_COLUMNS: [&str; 6] = [
    "hospital_unit",
    "primary_condition",
    "admissions",
    "avg_los",
    "readmission_rate",
    "avg_cost",
];

/// Columns of the cleaned file, in write order.
pub fn clean_columns() -> Vec<&'static str> {
    RAW_COLUMNS.iter().chain(DERIVED_COLUMNS.iter()).copied().collect()
}

/// Checks that `header` starts with [`RAW_COLUMNS`] in order.
///
/// Trailing columns are allowed so that a cleaned file, which appends the
/// derived columns, can be read back as input.
pub fn validate_header(header: &StringRecord) -> Result<()> {
    let found: Vec<&str> = header.iter().map(str::trim).collect();
    let matches = found.len() >= RAW_COLUMNS.len()
        && found.iter().zip(RAW_COLUMNS.iter()).all(|(f, e)| f == e);

    if matches {
        Ok(())
    } else {
        Err(EtlError::Schema {
            expected: RAW_COLUMNS.iter().map(|c| c.to_string()).collect(),
            found: found.into_iter().map(String::from).collect(),
        })
    }
}
