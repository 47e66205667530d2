//! Raw per-report outbreak records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw report: a country, the report date, and the counts it adds.
///
/// Counts are unsigned; negative values are rejected at ingest before
/// a `RawRecord` ever exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub country: String,
    pub date: NaiveDate,
    pub cases: u64,
    pub deaths: u64,
}
