use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArealError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("analysis could not be completed: {0}")]
    IncompleteInput(String),

    #[error("failed to load dataset policy from {path}: {reason}")]
    PolicyLoad { path: PathBuf, reason: String },

    #[error("invalid dataset policy: {0}")]
    PolicyInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
