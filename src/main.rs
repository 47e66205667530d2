//! Outbreak Analytics serving process
//!
//! Loads the model snapshot written by the `train` binary and serves the
//! aggregated dataset and severity predictions over HTTP. The snapshot is
//! read-only for the lifetime of the process; adopting a retrained
//! snapshot means restarting (or rebuilding the state around a fresh
//! load).

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use outbreak_analytics::config::Config;
use outbreak_analytics::server::{create_router, AppState};
use outbreak_analytics::snapshot::SnapshotStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outbreak_analytics=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Outbreak Analytics server starting...");

    // Load the model snapshot (classifier + encoder + aggregates, one unit)
    let store = SnapshotStore::new(&config.snapshot_path);
    let snapshot = store
        .load()
        .context("failed to load model snapshot; run the `train` binary first")?;
    tracing::info!(
        "Snapshot loaded: {} aggregates, {} trees, trained at {}",
        snapshot.aggregates.len(),
        snapshot.model.n_trees(),
        snapshot.trained_at
    );

    // Build application state and router
    let state = AppState::new(snapshot);
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
