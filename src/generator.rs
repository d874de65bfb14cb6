//! Synthetic raw admissions data.
//!
//! Output is fully determined by the configured seed and row count.

use chrono::{Duration, NaiveDate};
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Gamma};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::{EtlError, Result};
use crate::observe::{EtlEvent, EtlObserver};
use crate::transform::utility::round_to;
use crate::types::AdmissionRecord;

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
const GENDER_WEIGHTS: [u32; 3] = [48, 48, 4];

/// `"None"` here is a literal category, distinct from a missing value.
pub const CONDITIONS: [&str; 6] = [
    "Hypertension",
    "Diabetes",
    "COPD",
    "Heart Failure",
    "Depression",
    "None",
];

pub const ADMISSION_TYPES: [&str; 4] = ["Emergency", "Elective", "Urgent", "Newborn"];

pub const HOSPITAL_UNITS: [&str; 5] = [
    "ICU",
    "General Medicine",
    "Surgery",
    "Psychiatry",
    "Cardiology",
];

const AGE_RANGE: std::ops::Range<i64> = 18..90;
const STAY_SHAPE: f64 = 2.0;
const STAY_SCALE: f64 = 2.0;
const STAY_FLOOR: f64 = 0.5;
const WINDOW_DAYS: i64 = 365;
const READMISSION_PROBABILITY: f64 = 0.2;
const COST_PER_DAY: std::ops::Range<f64> = 800.0..2500.0;
const MISSING_COST_PROBABILITY: f64 = 0.05;
const MISSING_CONDITION_PROBABILITY: f64 = 0.03;

fn window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("2023-01-01 is a valid date")
}

/// Produces `rows` synthetic admissions from `seed`, including the injected
/// missing costs and conditions.
pub fn generate_admissions(rows: usize, seed: u64) -> Result<Vec<AdmissionRecord>> {
    let mut rng = StdRng::seed_from_u64(seed);

    let genders =
        WeightedIndex::new(GENDER_WEIGHTS).map_err(|e| EtlError::Distribution(e.to_string()))?;
    let stays =
        Gamma::new(STAY_SHAPE, STAY_SCALE).map_err(|e| EtlError::Distribution(e.to_string()))?;
    let start = window_start();

    let mut records = Vec::with_capacity(rows);

    for i in 0..rows {
        let age = rng.random_range(AGE_RANGE);
        let gender = GENDERS[genders.sample(&mut rng)];
        let condition = CONDITIONS[rng.random_range(0..CONDITIONS.len())];
        let admission_type = ADMISSION_TYPES[rng.random_range(0..ADMISSION_TYPES.len())];

        let stay = round_to(stays.sample(&mut rng), 1).max(STAY_FLOOR);

        let admission_date = start + Duration::days(rng.random_range(0..WINDOW_DAYS));
        // Whole days only; a partial final day still discharges on the same date.
        let discharge_date = admission_date + Duration::days(stay.floor() as i64);

        let readmitted = rng.random_bool(READMISSION_PROBABILITY);
        let cost = round_to(stay * rng.random_range(COST_PER_DAY), 2);
        let unit = HOSPITAL_UNITS[rng.random_range(0..HOSPITAL_UNITS.len())];

        records.push(AdmissionRecord {
            patient_id: i as i64 + 1,
            age,
            gender: gender.to_string(),
            primary_condition: Some(condition.to_string()),
            admission_type: admission_type.to_string(),
            length_of_stay_days: Some(stay),
            admission_date,
            discharge_date,
            readmitted_30d: u8::from(readmitted),
            total_cost_usd: Some(cost),
            hospital_unit: unit.to_string(),
        });
    }

    for record in records.iter_mut() {
        if rng.random_bool(MISSING_COST_PROBABILITY) {
            record.total_cost_usd = None;
        }
    }
    for record in records.iter_mut() {
        if rng.random_bool(MISSING_CONDITION_PROBABILITY) {
            record.primary_condition = None;
        }
    }

    Ok(records)
}

/// Writes admissions to `path` with a header row, replacing any existing file.
pub fn write_raw(path: &Path, records: &[AdmissionRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    debug!(path = %path.display(), rows = records.len(), "Writing raw CSV");

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Generates the configured dataset and writes it to `config.output_path`.
#[tracing::instrument(skip(observer), fields(rows = config.rows, seed = config.seed))]
pub fn run_generator(config: &GeneratorConfig, observer: &dyn EtlObserver) -> Result<()> {
    let records = generate_admissions(config.rows, config.seed)?;
    write_raw(&config.output_path, &records)?;

    observer.record(&EtlEvent::Generated {
        path: config.output_path.clone(),
        rows: records.len(),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_requested_rows_with_sequential_ids() {
        let records = generate_admissions(50, 7).unwrap();
        assert_eq!(records.len(), 50);
        for (i, r) in records.iter().enumerate() {
            assert_eq!(r.patient_id, i as i64 + 1);
        }
    }

    #[test]
    fn test_same_seed_same_records() {
        let a = generate_admissions(200, 42).unwrap();
        let b = generate_admissions(200, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_records() {
        let a = generate_admissions(200, 1).unwrap();
        let b = generate_admissions(200, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_value_ranges() {
        let start = window_start();
        let end = start + Duration::days(WINDOW_DAYS);

        for r in generate_admissions(1000, 42).unwrap() {
            assert!((18..90).contains(&r.age));
            assert!(GENDERS.contains(&r.gender.as_str()));
            assert!(ADMISSION_TYPES.contains(&r.admission_type.as_str()));
            assert!(HOSPITAL_UNITS.contains(&r.hospital_unit.as_str()));
            if let Some(c) = &r.primary_condition {
                assert!(CONDITIONS.contains(&c.as_str()));
            }

            let stay = r.length_of_stay_days.unwrap();
            assert!(stay >= STAY_FLOOR);
            assert!(r.admission_date >= start && r.admission_date < end);
            assert!(r.discharge_date >= r.admission_date);
            assert!(r.readmitted_30d <= 1);

            if let Some(cost) = r.total_cost_usd {
                assert!(cost >= 0.0);
                assert!(cost <= round_to(stay * COST_PER_DAY.end, 2));
            }
        }
    }

    #[test]
    fn test_injects_missing_values() {
        let records = generate_admissions(1000, 42).unwrap();
        let missing_cost = records.iter().filter(|r| r.total_cost_usd.is_none()).count();
        let missing_condition = records
            .iter()
            .filter(|r| r.primary_condition.is_none())
            .count();

        // Expected 50 and 30; bounds are loose enough for any seed.
        assert!(missing_cost > 10 && missing_cost < 120);
        assert!(missing_condition > 3 && missing_condition < 80);
    }

    #[test]
    fn test_write_raw_creates_parent_directory() {
        let dir = std::env::temp_dir().join("admissions_etl_test_write_raw");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("raw.csv");

        let records = generate_admissions(5, 3).unwrap();
        write_raw(&path, &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            crate::schema::RAW_COLUMNS.join(",")
        );
        assert_eq!(lines.count(), 5);

        fs::remove_dir_all(&dir).unwrap();
    }
}
