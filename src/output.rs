//! Persistence for cleaned and aggregated tables.
//!
//! Both tables are written as CSV with a header row, replacing whatever is at
//! the destination.

use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::observe::{EtlEvent, EtlObserver};
use crate::schema::{AGGREGATE_COLUMNS, clean_columns};
use crate::types::{AggregateRecord, CleanAdmission};

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `header` and then `rows` to `path` as CSV, truncating any existing
/// file.
///
/// The header is written even when `rows` is empty.
pub fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");

    let mut writer = WriterBuilder::new()
        .has_headers(false) // header comes from the schema, not the first row
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the cleaned table, then the aggregate table.
///
/// The cleaned table's parent directory is created first. A failure on the
/// second write leaves the cleaned file in place.
#[tracing::instrument(skip_all, fields(clean = %clean_path.display(), aggregate = %aggregate_path.display()))]
pub fn write_outputs(
    cleaned: &[CleanAdmission],
    aggregates: &[AggregateRecord],
    clean_path: &Path,
    aggregate_path: &Path,
    observer: &dyn EtlObserver,
) -> Result<()> {
    if let Some(parent) = clean_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    write_table(clean_path, &clean_columns(), cleaned)?;
    observer.record(&EtlEvent::Written {
        path: clean_path.to_path_buf(),
        rows: cleaned.len(),
    });

    write_table(aggregate_path, &AGGREGATE_COLUMNS, aggregates)?;
    observer.record(&EtlEvent::Written {
        path: aggregate_path.to_path_buf(),
        rows: aggregates.len(),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtlError;
    use crate::observe::RecordingObserver;
    use crate::ingest::ingest;
    use chrono::NaiveDate;
    use std::env;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir); // clean up any prior run
        dir
    }

    fn cleaned_row() -> CleanAdmission {
        let date = NaiveDate::from_ymd_opt(2023, 4, 2).unwrap();
        CleanAdmission {
            patient_id: 9,
            age: 81,
            gender: "Other".to_string(),
            primary_condition: "Heart Failure".to_string(),
            admission_type: "Emergency".to_string(),
            length_of_stay_days: 3.5,
            admission_date: date,
            discharge_date: date,
            readmitted_30d: 1,
            total_cost_usd: 4200.25,
            hospital_unit: "Cardiology".to_string(),
            year: 2023,
            month: 4,
            is_elderly: 1,
        }
    }

    fn aggregate_row() -> AggregateRecord {
        AggregateRecord {
            hospital_unit: "Cardiology".to_string(),
            primary_condition: "Heart Failure".to_string(),
            admissions: 1,
            avg_los: 3.5,
            readmission_rate: 100.0,
            avg_cost: 4200.25,
        }
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&aggregate_row()).unwrap();
    }

    #[test]
    fn test_write_outputs_creates_directories_and_headers() {
        let dir = temp_dir("admissions_etl_test_write_outputs");
        let clean_path = dir.join("processed").join("clean.csv");
        let aggregate_path = dir.join("processed").join("agg.csv");

        let observer = RecordingObserver::new();
        write_outputs(
            &[cleaned_row()],
            &[aggregate_row()],
            &clean_path,
            &aggregate_path,
            &observer,
        )
        .unwrap();

        let clean = fs::read_to_string(&clean_path).unwrap();
        let lines: Vec<_> = clean.lines().collect();
        assert_eq!(lines[0], clean_columns().join(","));
        assert_eq!(
            lines[1],
            "9,81,Other,Heart Failure,Emergency,3.5,2023-04-02,2023-04-02,1,4200.25,Cardiology,2023,4,1"
        );

        let agg = fs::read_to_string(&aggregate_path).unwrap();
        let lines: Vec<_> = agg.lines().collect();
        assert_eq!(lines[0], AGGREGATE_COLUMNS.join(","));
        assert_eq!(lines[1], "Cardiology,Heart Failure,1,3.5,100.0,4200.25");

        assert_eq!(observer.events().len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_table_overwrites() {
        let dir = temp_dir("admissions_etl_test_overwrite");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("agg.csv");

        write_table(&path, &AGGREGATE_COLUMNS, &[aggregate_row(), aggregate_row()]).unwrap();
        write_table(&path, &AGGREGATE_COLUMNS, &[aggregate_row()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_tables_keep_headers() {
        let dir = temp_dir("admissions_etl_test_empty_tables");
        let clean_path = dir.join("clean.csv");
        let aggregate_path = dir.join("agg.csv");

        let observer = RecordingObserver::new();
        write_outputs(&[], &[], &clean_path, &aggregate_path, &observer).unwrap();

        let clean = fs::read_to_string(&clean_path).unwrap();
        assert_eq!(clean.lines().collect::<Vec<_>>(), vec![clean_columns().join(",")]);
        let agg = fs::read_to_string(&aggregate_path).unwrap();
        assert_eq!(agg.lines().collect::<Vec<_>>(), vec![AGGREGATE_COLUMNS.join(",")]);

        // An empty cleaned file is still valid input.
        let reread = ingest(&clean_path, &observer).unwrap();
        assert!(reread.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = temp_dir("admissions_etl_test_unwritable");
        fs::create_dir_all(&dir).unwrap();
        // A regular file where a directory is expected.
        let blocker = dir.join("blocker");
        fs::write(&blocker, "x").unwrap();

        let result = write_outputs(
            &[cleaned_row()],
            &[aggregate_row()],
            &blocker.join("clean.csv"),
            &dir.join("agg.csv"),
            &RecordingObserver::new(),
        );
        assert!(matches!(result, Err(EtlError::Io(_))));
        assert!(!dir.join("agg.csv").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
