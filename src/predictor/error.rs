use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the artifacts directory at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model files not found. Please ensure models are trained and saved. (missing {0})")]
    Missing(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid label encoders: {0}")]
    Encoders(#[from] serde_json::Error),
    #[error("invalid model artifacts: {0}")]
    Invalid(String),
    #[error(transparent)]
    Candle(#[from] candle_core::Error),
}

/// A record rejected by range validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Failures while serving a single prediction.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Candle(#[from] candle_core::Error),
    #[error("{target}: {reason}")]
    Decode { target: String, reason: String },
}
