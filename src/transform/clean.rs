use chrono::Datelike;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::{EtlError, Result};
use crate::observe::{EtlEvent, EtlObserver};
use crate::transform::utility::median;
use crate::types::{AdmissionRecord, CleanAdmission};

pub const UNKNOWN_CONDITION: &str = "Unknown";
pub const STAY_FLOOR: f64 = 0.5;
pub const ELDERLY_AGE: i64 = 65;

/// Counts of what cleaning changed.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    pub duplicates_removed: usize,
    pub conditions_filled: usize,
    pub costs_filled: usize,
    pub median_cost: Option<f64>,
    pub stays_clamped: usize,
    pub stays_missing: usize,
}

/// Keeps the first row for each (patient, admission date, unit) key, in file order.
pub fn drop_duplicates(records: Vec<AdmissionRecord>) -> (Vec<AdmissionRecord>, usize) {
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);

    let kept: Vec<AdmissionRecord> = records
        .into_iter()
        .filter(|r| seen.insert((r.patient_id, r.admission_date, r.hospital_unit.clone())))
        .collect();

    let removed = before - kept.len();
    (kept, removed)
}

/// Cleans raw admissions. Steps run in a fixed order:
///
/// 1. drop duplicate (patient, admission date, unit) rows, keeping the first;
/// 2. set missing primary conditions to `"Unknown"`;
/// 3. fill missing costs with the median of the remaining non-null costs;
/// 4. raise lengths of stay below 0.5 to 0.5 (a missing stay becomes 0.5);
/// 5. derive year, month, and the elderly flag.
///
/// # Errors
///
/// [`EtlError::NoCostObservations`] when some cost is missing and no
/// non-null cost exists to take a median from.
#[tracing::instrument(skip_all, fields(rows = records.len()))]
pub fn clean(
    records: Vec<AdmissionRecord>,
    observer: &dyn EtlObserver,
) -> Result<(Vec<CleanAdmission>, CleaningReport)> {
    let mut report = CleaningReport::default();

    let (records, removed) = drop_duplicates(records);
    report.duplicates_removed = removed;
    observer.record(&EtlEvent::DuplicatesRemoved { removed });

    let costs: Vec<f64> = records.iter().filter_map(|r| r.total_cost_usd).collect();
    report.median_cost = median(&costs);
    let missing_costs = records.len() - costs.len();
    let fill_cost = match (missing_costs, report.median_cost) {
        (0, m) => m.unwrap_or_default(),
        (_, Some(m)) => m,
        (_, None) => return Err(EtlError::NoCostObservations),
    };

    let cleaned: Vec<CleanAdmission> = records
        .into_iter()
        .map(|r| {
            let primary_condition = r.primary_condition.unwrap_or_else(|| {
                report.conditions_filled += 1;
                UNKNOWN_CONDITION.to_string()
            });

            let total_cost_usd = r.total_cost_usd.unwrap_or_else(|| {
                report.costs_filled += 1;
                fill_cost
            });

            let length_of_stay_days = match r.length_of_stay_days {
                Some(stay) if stay < STAY_FLOOR => {
                    report.stays_clamped += 1;
                    STAY_FLOOR
                }
                Some(stay) => stay,
                None => {
                    report.stays_missing += 1;
                    STAY_FLOOR
                }
            };

            CleanAdmission {
                patient_id: r.patient_id,
                age: r.age,
                gender: r.gender,
                primary_condition,
                admission_type: r.admission_type,
                length_of_stay_days,
                year: r.admission_date.year(),
                month: r.admission_date.month(),
                admission_date: r.admission_date,
                discharge_date: r.discharge_date,
                readmitted_30d: r.readmitted_30d,
                total_cost_usd,
                hospital_unit: r.hospital_unit,
                is_elderly: u8::from(r.age >= ELDERLY_AGE),
            }
        })
        .collect();

    observer.record(&EtlEvent::ConditionsFilled {
        filled: report.conditions_filled,
    });
    observer.record(&EtlEvent::CostsFilled {
        filled: report.costs_filled,
        median: fill_cost,
    });
    observer.record(&EtlEvent::StayClamped {
        clamped: report.stays_clamped,
        missing: report.stays_missing,
    });

    Ok((cleaned, report))
}
