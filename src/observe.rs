//! Progress reporting for the generator and pipeline stages.
//!
//! Stages describe what happened as [`EtlEvent`]s and hand them to an
//! [`EtlObserver`]; they never log directly.

use std::cell::RefCell;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum EtlEvent {
    Generated { path: PathBuf, rows: usize },
    Ingested { path: PathBuf, rows: usize },
    DuplicatesRemoved { removed: usize },
    ConditionsFilled { filled: usize },
    CostsFilled { filled: usize, median: f64 },
    StayClamped { clamped: usize, missing: usize },
    Aggregated { groups: usize },
    Written { path: PathBuf, rows: usize },
}

/// Sink for pipeline progress events.
pub trait EtlObserver {
    fn record(&self, event: &EtlEvent);
}

/// Emits every event as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EtlObserver for TracingObserver {
    fn record(&self, event: &EtlEvent) {
        match event {
            EtlEvent::Generated { path, rows } => {
                info!(path = %path.display(), rows, "Raw admissions generated")
            }
            EtlEvent::Ingested { path, rows } => {
                info!(path = %path.display(), rows, "Raw admissions loaded")
            }
            EtlEvent::DuplicatesRemoved { removed } => info!(removed, "Duplicate rows removed"),
            EtlEvent::ConditionsFilled { filled } => {
                info!(filled, "Missing primary conditions set to Unknown")
            }
            EtlEvent::CostsFilled { filled, median } => {
                info!(filled, median, "Missing total costs imputed with median")
            }
            EtlEvent::StayClamped { clamped, missing } => {
                if *missing > 0 {
                    warn!(missing, "Missing length of stay set to floor value");
                }
                info!(clamped, "Length of stay clamped to floor")
            }
            EtlEvent::Aggregated { groups } => info!(groups, "Aggregated unit/condition metrics"),
            EtlEvent::Written { path, rows } => {
                info!(path = %path.display(), rows, "Table written")
            }
        }
    }
}

/// Keeps events in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<EtlEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EtlEvent> {
        self.events.borrow().clone()
    }
}

impl EtlObserver for RecordingObserver {
    fn record(&self, event: &EtlEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
