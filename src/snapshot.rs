//! Model snapshot persistence
//!
//! The trained forest, the label encoder it was fitted with, and the
//! aggregated dataset travel as one unit. A snapshot missing any part is
//! corrupt, not "missing optional extras": decoding predictions with a
//! different encoder than the one used at training time would be silently
//! wrong.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::MonthlyAggregate;
use crate::pipeline::{LabelEncoder, RandomForest};

pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// The (classifier, codec, aggregates) triple plus training metadata.
///
/// Created by an offline training run; loaded read-only by the server.
/// A retraining run replaces the whole snapshot, never parts of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub format_version: u32,
    pub trained_at: DateTime<Utc>,
    pub model: RandomForest,
    pub encoder: LabelEncoder,
    pub aggregates: Vec<MonthlyAggregate>,
}

impl ModelSnapshot {
    pub fn new(
        model: RandomForest,
        encoder: LabelEncoder,
        aggregates: Vec<MonthlyAggregate>,
    ) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            trained_at: Utc::now(),
            model,
            encoder,
            aggregates,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot not found at {0}")]
    Missing(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is corrupt: {0}")]
    Corrupt(String),
}

/// Reads and writes one snapshot file.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot atomically: serialize to a sibling temp file,
    /// then rename into place. A reader never observes a partial write.
    pub fn save(&self, snapshot: &ModelSnapshot) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec(snapshot).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;

        tracing::info!(
            "snapshot saved to {} ({} aggregates, {} trees)",
            self.path.display(),
            snapshot.aggregates.len(),
            snapshot.model.n_trees()
        );
        Ok(())
    }

    /// Load and validate a snapshot. Any missing or inconsistent part is
    /// a consistency error for the operator; there is no partial load.
    pub fn load(&self) -> Result<ModelSnapshot, SnapshotError> {
        if !self.path.exists() {
            return Err(SnapshotError::Missing(self.path.clone()));
        }

        let content = fs::read(&self.path)?;
        let snapshot: ModelSnapshot =
            serde_json::from_slice(&content).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;

        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::Corrupt(format!(
                "unsupported format version {} (expected {})",
                snapshot.format_version, SNAPSHOT_FORMAT_VERSION
            )));
        }
        if snapshot.model.n_trees() == 0 {
            return Err(SnapshotError::Corrupt("model has no trees".to_string()));
        }
        if snapshot.encoder.n_classes() == 0 {
            return Err(SnapshotError::Corrupt(
                "label encoder has no classes".to_string(),
            ));
        }
        if snapshot.aggregates.is_empty() {
            return Err(SnapshotError::Corrupt(
                "snapshot carries no aggregated data".to_string(),
            ));
        }
        if snapshot.model.n_classes() != snapshot.encoder.n_classes() {
            return Err(SnapshotError::Corrupt(format!(
                "model predicts {} classes but encoder holds {}",
                snapshot.model.n_classes(),
                snapshot.encoder.n_classes()
            )));
        }

        Ok(snapshot)
    }
}
