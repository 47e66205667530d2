//! Monthly per-country aggregation

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::models::{MonthlyAggregate, RawRecord, Severity};

/// Sum raw records into one aggregate per distinct (country, year, month)
/// and attach the rule-based severity status.
///
/// The sums are permutation-invariant over the input; the output happens
/// to come back sorted by key, but consumers must not rely on order.
pub fn aggregate_monthly(records: &[RawRecord]) -> Vec<MonthlyAggregate> {
    let mut buckets: BTreeMap<(String, i32, u32), (u64, u64)> = BTreeMap::new();

    for record in records {
        let key = (record.country.clone(), record.date.year(), record.date.month());
        let entry = buckets.entry(key).or_insert((0, 0));
        entry.0 += record.cases;
        entry.1 += record.deaths;
    }

    buckets
        .into_iter()
        .map(|((country, year, month), (cases, deaths))| MonthlyAggregate {
            country,
            year,
            month,
            cases,
            deaths,
            status: Severity::from_cases(cases),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(country: &str, y: i32, m: u32, d: u32, cases: u64, deaths: u64) -> RawRecord {
        RawRecord {
            country: country.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            cases,
            deaths,
        }
    }

    #[test]
    fn test_aggregation_sums_by_country_month() {
        let records = vec![
            record("Guinea", 2014, 3, 10, 50, 20),
            record("Guinea", 2014, 3, 25, 60, 19),
            record("Guinea", 2014, 4, 1, 5, 2),
            record("Liberia", 2014, 3, 27, 8, 6),
        ];
        let aggregates = aggregate_monthly(&records);
        assert_eq!(aggregates.len(), 3);

        let guinea_march = aggregates
            .iter()
            .find(|a| a.country == "Guinea" && a.month == 3)
            .unwrap();
        assert_eq!(guinea_march.year, 2014);
        assert_eq!(guinea_march.cases, 110);
        assert_eq!(guinea_march.deaths, 39);
        assert_eq!(guinea_march.status, Severity::Epidemic);
    }

    #[test]
    fn test_aggregation_is_permutation_invariant() {
        let mut records = vec![
            record("Guinea", 2014, 3, 1, 10, 1),
            record("Guinea", 2014, 3, 8, 20, 2),
            record("Sierra Leone", 2014, 5, 2, 7, 0),
            record("Guinea", 2014, 3, 30, 30, 3),
            record("Sierra Leone", 2014, 5, 9, 0, 0),
        ];
        let forward = aggregate_monthly(&records);
        records.reverse();
        let backward = aggregate_monthly(&records);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_zero_case_month_is_neither() {
        let aggregates = aggregate_monthly(&[record("Mali", 2015, 1, 3, 0, 0)]);
        assert_eq!(aggregates[0].status, Severity::Neither);
    }
}
