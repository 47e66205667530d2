//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::pipeline::PipelineError;
use crate::snapshot::SnapshotError;

pub type AppResult<T> = Result<T, AppError>;

/// Request-scoped failures surfaced to the HTTP caller.
///
/// Validation errors carry their detail to the client; internal and
/// snapshot errors are logged and masked. Nothing is retried and nothing
/// is replaced with a default severity.
#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    SnapshotError(String),
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::SnapshotError(msg) => {
                tracing::error!("Snapshot error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Model snapshot unavailable")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            // An unknown code at serving time means the snapshot's model
            // and encoder disagree, which is an operator problem.
            PipelineError::UnknownCode { .. } | PipelineError::UnknownLabel(_) => {
                AppError::SnapshotError(err.to_string())
            }
            other => AppError::ValidationError(other.to_string()),
        }
    }
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        AppError::SnapshotError(err.to_string())
    }
}
