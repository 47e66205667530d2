//! Status prediction handler

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::FeatureRow;
use crate::server::AppState;

/// Predict a severity status for each feature row.
///
/// Rows missing a field or carrying unknown/non-numeric fields never
/// reach this point; the JSON extractor rejects the whole body as a
/// client error. Every row in a batch is decoded with the snapshot's one
/// encoder.
pub async fn predict(
    State(state): State<AppState>,
    Json(rows): Json<Vec<FeatureRow>>,
) -> AppResult<Json<Vec<String>>> {
    let snapshot = &state.snapshot;

    let mut statuses = Vec::with_capacity(rows.len());
    for row in &rows {
        let code = snapshot.model.predict(&row.to_features());
        let status = snapshot.encoder.decode(code)?;
        statuses.push(status.as_str().to_string());
    }

    tracing::debug!("predicted {} row(s)", statuses.len());
    Ok(Json(statuses))
}
