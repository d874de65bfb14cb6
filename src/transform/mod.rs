//! Cleaning and aggregation of admissions.
//!
//! Cleaning deduplicates, fills missing values, and derives calendar and age
//! columns; aggregation summarises the cleaned rows per hospital unit and
//! primary condition.

pub mod aggregate;
pub mod clean;
pub mod utility;

pub use aggregate::aggregate;
pub use clean::{CleaningReport, clean};
