//! Aggregated-data handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::pipeline::PipelineError;
use crate::server::AppState;

/// One row of the aggregated dataset as served to the presentation layer.
///
/// Status carries the label code (not the name), matching the encoding
/// the classifier was trained on; clients decode through `/predict`
/// output or filter client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Cases")]
    pub cases: u64,
    #[serde(rename = "Deaths")]
    pub deaths: u64,
    #[serde(rename = "Status")]
    pub status: usize,
}

/// Return the full aggregated dataset from the current snapshot.
///
/// The response rows are built at most once per process lifetime; the
/// memo is dropped only when a new `AppState` is constructed around a
/// reloaded snapshot.
pub async fn get_data(State(state): State<AppState>) -> AppResult<Json<Vec<AggregateRecord>>> {
    let rows = state.data_cache.get_or_try_init(|| {
        tracing::debug!(
            "building aggregated data response ({} rows)",
            state.snapshot.aggregates.len()
        );
        state
            .snapshot
            .aggregates
            .iter()
            .map(|agg| {
                Ok(AggregateRecord {
                    country: agg.country.clone(),
                    year: agg.year,
                    month: agg.month,
                    cases: agg.cases,
                    deaths: agg.deaths,
                    status: state.snapshot.encoder.encode(agg.status)?,
                })
            })
            .collect::<Result<Vec<_>, PipelineError>>()
    })?;

    Ok(Json(rows.clone()))
}
