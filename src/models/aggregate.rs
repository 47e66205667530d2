//! Monthly aggregates and classifier feature rows

use serde::{Deserialize, Serialize};

use super::severity::Severity;

/// Number of numeric features the classifier consumes.
pub const FEATURE_COUNT: usize = 4;

/// Summed cases and deaths for one (country, year, month), with the
/// rule-based severity status attached at aggregation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub country: String,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub cases: u64,
    pub deaths: u64,
    pub status: Severity,
}

/// The exact four numeric fields a prediction request must carry.
///
/// Field order in the numeric vector is [cases, deaths, month, year];
/// both the names and the presence of all four are part of the wire
/// contract, so unknown or missing fields reject the whole request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeatureRow {
    #[serde(rename = "Cases")]
    pub cases: u64,
    #[serde(rename = "Deaths")]
    pub deaths: u64,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Year")]
    pub year: i32,
}

impl FeatureRow {
    pub fn from_aggregate(agg: &MonthlyAggregate) -> Self {
        Self {
            cases: agg.cases,
            deaths: agg.deaths,
            month: agg.month,
            year: agg.year,
        }
    }

    /// Numeric vector in the contract order [cases, deaths, month, year].
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.cases as f64,
            self.deaths as f64,
            self.month as f64,
            self.year as f64,
        ]
    }
}
