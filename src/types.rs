//! Record types flowing through the pipeline.
//!
//! Field names double as CSV column names, so their declaration order is the
//! column order on disk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Serializes dates as `YYYY-MM-DD`.
mod iso_date {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }
}

/// One admission as found in the raw file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmissionRecord {
    pub patient_id: i64,
    pub age: i64,
    pub gender: String,
    pub primary_condition: Option<String>,
    pub admission_type: String,
    pub length_of_stay_days: Option<f64>,
    #[serde(serialize_with = "iso_date::serialize")]
    pub admission_date: NaiveDate,
    #[serde(serialize_with = "iso_date::serialize")]
    pub discharge_date: NaiveDate,
    pub readmitted_30d: u8,
    pub total_cost_usd: Option<f64>,
    pub hospital_unit: String,
}

/// Raw CSV row before date columns are parsed.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRow {
    pub(crate) patient_id: i64,
    pub(crate) age: i64,
    pub(crate) gender: String,
    pub(crate) primary_condition: Option<String>,
    pub(crate) admission_type: String,
    pub(crate) length_of_stay_days: Option<f64>,
    pub(crate) admission_date: String,
    pub(crate) discharge_date: String,
    pub(crate) readmitted_30d: u8,
    pub(crate) total_cost_usd: Option<f64>,
    pub(crate) hospital_unit: String,
}

/// An admission after cleaning: fills applied and derived columns added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanAdmission {
    pub patient_id: i64,
    pub age: i64,
    pub gender: String,
    pub primary_condition: String,
    pub admission_type: String,
    pub length_of_stay_days: f64,
    #[serde(serialize_with = "iso_date::serialize")]
    pub admission_date: NaiveDate,
    #[serde(serialize_with = "iso_date::serialize")]
    pub discharge_date: NaiveDate,
    pub readmitted_30d: u8,
    pub total_cost_usd: f64,
    pub hospital_unit: String,
    pub year: i32,
    pub month: u32,
    pub is_elderly: u8,
}

/// Summary metrics for one (hospital unit, primary condition) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRecord {
    pub hospital_unit: String,
    pub primary_condition: String,
    pub admissions: usize,
    pub avg_los: f64,
    /// Percentage of the group readmitted within 30 days.
    pub readmission_rate: f64,
    pub avg_cost: f64,
}
