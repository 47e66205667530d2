//! Severity status derived from monthly case counts

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monthly case count at or above this is an epidemic.
pub const EPIDEMIC_THRESHOLD: u64 = 100;

/// Monthly case count at or above this is a pandemic.
pub const PANDEMIC_THRESHOLD: u64 = 1_000;

/// Outbreak severity for one country-month, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Neither,
    Emergence,
    Epidemic,
    Pandemic,
}

impl Severity {
    /// Derive the severity status from an aggregated monthly case count.
    ///
    /// Pure and total over `u64`; the thresholds are closed-open
    /// (100 cases is already an epidemic, 1000 already a pandemic).
    pub fn from_cases(cases: u64) -> Self {
        if cases == 0 {
            Severity::Neither
        } else if cases < EPIDEMIC_THRESHOLD {
            Severity::Emergence
        } else if cases < PANDEMIC_THRESHOLD {
            Severity::Epidemic
        } else {
            Severity::Pandemic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Neither => "neither",
            Severity::Emergence => "emergence",
            Severity::Epidemic => "epidemic",
            Severity::Pandemic => "pandemic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "neither" => Some(Severity::Neither),
            "emergence" => Some(Severity::Emergence),
            "epidemic" => Some(Severity::Epidemic),
            "pandemic" => Some(Severity::Pandemic),
            _ => None,
        }
    }

    /// All severity categories, in ordinal order.
    pub fn all() -> [Severity; 4] {
        [
            Severity::Neither,
            Severity::Emergence,
            Severity::Epidemic,
            Severity::Pandemic,
        ]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
