//! Serving state and router
//!
//! The snapshot handle is constructor-injected: reload means loading a
//! fresh snapshot, building a new `AppState`, and swapping the reference.
//! Nothing here mutates shared state in place.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use once_cell::sync::OnceCell;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::handlers::data::AggregateRecord;
use crate::snapshot::ModelSnapshot;

/// Shared application state
///
/// The snapshot is immutable after load, so concurrent readers share it
/// without synchronization. The data cache is computed at most once per
/// process lifetime; concurrent first callers block on the one
/// computation and all observe the same result.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<ModelSnapshot>,
    pub data_cache: Arc<OnceCell<Vec<AggregateRecord>>>,
}

impl AppState {
    pub fn new(snapshot: ModelSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            data_cache: Arc::new(OnceCell::new()),
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/data", get(handlers::data::get_data))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
