//! Raw record ingestion from CSV
//!
//! Input is a headered CSV with columns `Country,Date,Cases,Deaths`.
//! Validation is all-or-nothing: the first unparseable date or negative
//! count aborts the whole batch, since a silently dropped row would
//! corrupt the downstream severity labels.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;

use crate::models::RawRecord;
use crate::pipeline::PipelineError;

/// Accepted date spellings; public datasets mix ISO and US formats.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Cases")]
    cases: i64,
    #[serde(rename = "Deaths")]
    deaths: i64,
}

/// Load and validate raw records from a CSV file.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    read_raw_records_inner(reader)
}

/// Load and validate raw records from any reader (used by tests).
pub fn read_raw_records<R: Read>(input: R) -> Result<Vec<RawRecord>, PipelineError> {
    let reader = ReaderBuilder::new().has_headers(true).from_reader(input);
    read_raw_records_inner(reader)
}

fn read_raw_records_inner<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<RawRecord>, PipelineError> {
    let mut records = Vec::new();

    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Header occupies line 1.
        let line = idx + 2;
        let row = row?;

        let date = parse_date(&row.date).ok_or_else(|| PipelineError::InvalidDate {
            line,
            value: row.date.clone(),
        })?;

        if row.cases < 0 {
            return Err(PipelineError::NegativeCount {
                line,
                field: "Cases",
                value: row.cases,
            });
        }
        if row.deaths < 0 {
            return Err(PipelineError::NegativeCount {
                line,
                field: "Deaths",
                value: row.deaths,
            });
        }

        records.push(RawRecord {
            country: row.country,
            date,
            cases: row.cases as u64,
            deaths: row.deaths as u64,
        });
    }

    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    tracing::debug!("ingested {} raw records", records.len());
    Ok(records)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw.trim(), fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "Country,Date,Cases,Deaths\n\
                        Guinea,2014-03-25,86,59\n\
                        Liberia,3/27/2014,8,6\n";

    #[test]
    fn test_ingest_parses_both_date_formats() {
        let records = read_raw_records(GOOD.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country, "Guinea");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2014, 3, 25).unwrap());
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2014, 3, 27).unwrap());
        assert_eq!(records[1].cases, 8);
    }

    #[test]
    fn test_ingest_rejects_batch_with_bad_date() {
        let input = "Country,Date,Cases,Deaths\n\
                     Guinea,2014-03-25,86,59\n\
                     Guinea,not-a-date,10,1\n";
        let err = read_raw_records(input.as_bytes()).unwrap_err();
        match err {
            PipelineError::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ingest_rejects_negative_counts() {
        let input = "Country,Date,Cases,Deaths\n\
                     Guinea,2014-03-25,-4,0\n";
        assert!(matches!(
            read_raw_records(input.as_bytes()),
            Err(PipelineError::NegativeCount { field: "Cases", .. })
        ));
    }

    #[test]
    fn test_ingest_rejects_empty_input() {
        let input = "Country,Date,Cases,Deaths\n";
        assert!(matches!(
            read_raw_records(input.as_bytes()),
            Err(PipelineError::EmptyDataset)
        ));
    }
}
