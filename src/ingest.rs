//! Reads a raw admissions CSV into typed records.

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::error::{EtlError, Result};
use crate::observe::{EtlEvent, EtlObserver};
use crate::schema::validate_header;
use crate::types::{AdmissionRecord, RawRow};

/// Parses a calendar date from `YYYY-MM-DD`, or from `YYYY-MM-DD HH:MM:SS`
/// keeping only the date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .ok()
}

fn date_column(line: u64, column: &'static str, value: String) -> Result<NaiveDate> {
    parse_date(&value).ok_or(EtlError::DateParse {
        line,
        column,
        value,
    })
}

/// Loads every row of the file at `path`, in file order.
///
/// # Errors
///
/// [`EtlError::InputNotFound`] if `path` does not exist, [`EtlError::Schema`]
/// if the header does not start with the raw columns, [`EtlError::DateParse`]
/// for an unreadable date, and [`EtlError::Csv`] for any other malformed row.
#[tracing::instrument(skip(observer), fields(path = %path.display()))]
pub fn ingest(path: &Path, observer: &dyn EtlObserver) -> Result<Vec<AdmissionRecord>> {
    if !path.exists() {
        return Err(EtlError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let headers = rdr.headers()?.clone();
    validate_header(&headers)?;

    let mut records = Vec::new();
    let mut record = StringRecord::new();

    while rdr.read_record(&mut record)? {
        let row: RawRow = record.deserialize(Some(&headers))?;
        // Line the record starts on; quoted fields may span several.
        let line = record.position().map_or(0, |p| p.line());

        records.push(AdmissionRecord {
            patient_id: row.patient_id,
            age: row.age,
            gender: row.gender,
            primary_condition: row.primary_condition,
            admission_type: row.admission_type,
            length_of_stay_days: row.length_of_stay_days,
            admission_date: date_column(line, "admission_date", row.admission_date)?,
            discharge_date: date_column(line, "discharge_date", row.discharge_date)?,
            readmitted_30d: row.readmitted_30d,
            total_cost_usd: row.total_cost_usd,
            hospital_unit: row.hospital_unit,
        });
    }

    debug!(rows = records.len(), "CSV parsed");
    observer.record(&EtlEvent::Ingested {
        path: path.to_path_buf(),
        rows: records.len(),
    });

    Ok(records)
}
