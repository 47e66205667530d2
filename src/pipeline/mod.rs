//! Aggregation and status-classification pipeline
//!
//! Offline write path: `ingest` → `aggregate` → `trainer` (which fits the
//! `encoder` and the `forest`). The serving process only ever reads the
//! artifacts this pipeline produces.

pub mod aggregate;
pub mod encoder;
pub mod forest;
pub mod ingest;
pub mod trainer;

pub use aggregate::aggregate_monthly;
pub use encoder::LabelEncoder;
pub use forest::{ForestParams, RandomForest};
pub use trainer::{train, EvalReport, TrainOutcome};

/// Errors raised while transforming raw input into a trained model.
///
/// Every variant is a hard stop for the batch it occurs in; the pipeline
/// never drops or coerces individual rows.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: unparseable date '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: negative {field} count ({value})")]
    NegativeCount {
        line: usize,
        field: &'static str,
        value: i64,
    },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("dataset contains {found} distinct severity class(es); at least 2 required")]
    TooFewClasses { found: usize },

    #[error("label '{0}' is not in the fitted vocabulary")]
    UnknownLabel(String),

    #[error("label code {code} out of range (vocabulary size {n_classes})")]
    UnknownCode { code: usize, n_classes: usize },
}
