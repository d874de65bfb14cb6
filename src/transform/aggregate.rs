use std::collections::BTreeMap;

use crate::observe::{EtlEvent, EtlObserver};
use crate::transform::utility::{mean, round_to};
use crate::types::{AggregateRecord, CleanAdmission};

#[derive(Default)]
struct GroupSeries {
    stays: Vec<f64>,
    readmissions: Vec<f64>,
    costs: Vec<f64>,
}

/// Groups cleaned admissions by (hospital unit, primary condition) and
/// computes one [`AggregateRecord`] per group.
///
/// Mean stay and mean cost are rounded to 2 decimals; the readmission rate is
/// a percentage rounded to 1 decimal. Rows come out sorted by unit, then
/// condition.
pub fn aggregate(records: &[CleanAdmission], observer: &dyn EtlObserver) -> Vec<AggregateRecord> {
    let mut groups: BTreeMap<(&str, &str), GroupSeries> = BTreeMap::new();

    for r in records {
        let series = groups
            .entry((r.hospital_unit.as_str(), r.primary_condition.as_str()))
            .or_default();
        series.stays.push(r.length_of_stay_days);
        series.readmissions.push(f64::from(r.readmitted_30d));
        series.costs.push(r.total_cost_usd);
    }

    let aggregates: Vec<AggregateRecord> = groups
        .into_iter()
        .map(|((unit, condition), series)| AggregateRecord {
            hospital_unit: unit.to_string(),
            primary_condition: condition.to_string(),
            admissions: series.stays.len(),
            avg_los: round_to(mean(&series.stays), 2),
            readmission_rate: round_to(mean(&series.readmissions) * 100.0, 1),
            avg_cost: round_to(mean(&series.costs), 2),
        })
        .collect();

    observer.record(&EtlEvent::Aggregated {
        groups: aggregates.len(),
    });

    aggregates
}
