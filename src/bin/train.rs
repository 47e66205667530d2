//! Offline training job
//!
//! Ingest raw records, aggregate them monthly, train the severity
//! classifier, print the held-out evaluation report, and persist the
//! whole snapshot atomically. This is the single write path; the server
//! only ever reads what this job produces.

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use outbreak_analytics::config::Config;
use outbreak_analytics::pipeline::{aggregate_monthly, ingest, train, ForestParams};
use outbreak_analytics::snapshot::{ModelSnapshot, SnapshotStore};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outbreak_analytics=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Training run starting (data: {})", config.data_path);

    let records = ingest::load_raw_records(Path::new(&config.data_path))
        .context("failed to ingest raw records")?;
    tracing::info!("{} raw records ingested", records.len());

    let aggregates = aggregate_monthly(&records);
    tracing::info!("{} monthly aggregates", aggregates.len());

    let outcome = train(&aggregates, &ForestParams::default())
        .context("training failed")?;
    println!("{}", outcome.report);

    let snapshot = ModelSnapshot::new(outcome.model, outcome.encoder, aggregates);
    let store = SnapshotStore::new(&config.snapshot_path);
    store.save(&snapshot).context("failed to persist snapshot")?;

    tracing::info!("Snapshot written to {}", config.snapshot_path);
    Ok(())
}
