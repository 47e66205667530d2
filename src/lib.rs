//! Outbreak Analytics core library
//!
//! Pipeline: raw per-report records → monthly per-country aggregates →
//! rule-based severity labels → random-forest classifier → persisted
//! model snapshot → HTTP serving.
//!
//! The `train` binary runs the offline write path; `outbreak-server`
//! loads the resulting snapshot and serves it read-only.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod server;
pub mod snapshot;

pub use error::{AppError, AppResult};
