//! Configuration module

use std::env;

/// Application configuration, shared by the server and the training job.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Path of the persisted model snapshot
    pub snapshot_path: String,

    /// Path of the raw-records CSV consumed by the training job
    pub data_path: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            snapshot_path: env::var("SNAPSHOT_PATH")
                .unwrap_or_else(|_| "snapshot.json".to_string()),

            data_path: env::var("DATA_PATH").unwrap_or_else(|_| "data.csv".to_string()),
        }
    }
}
