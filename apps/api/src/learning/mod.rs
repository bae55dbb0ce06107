// Feedback-driven retraining of the course classifier, artifact persistence and prediction.

pub mod artifacts;
pub mod classifier;
pub mod dataset;
pub mod feedback;
pub mod handlers;
pub mod predictor;
pub mod retrainer;

use thiserror::Error;

/// Failures inside the training pipeline. Never surfaced to the trigger
/// caller; the retrainer logs them and records a failed run.
#[derive(Debug, Error)]
pub enum LearningError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Inconsistent artifacts: {0}")]
    Inconsistent(String),
}
