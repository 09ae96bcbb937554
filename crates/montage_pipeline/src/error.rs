//! Error types for the pipeline system

use montage_types::MontageError;
use thiserror::Error;

/// Pipeline-specific error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage not found: {name}")]
    StageNotFound { name: String },

    #[error("Circular dependency detected in pipeline graph at stage '{name}'")]
    CircularDependency { name: String },

    #[error("Invalid pipeline configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Runtime error in stage '{stage_name}': {message}")]
    RuntimeError { stage_name: String, message: String },

    #[error("Stage '{stage_name}' failed: {source}")]
    Stage {
        stage_name: String,
        #[source]
        source: StageError,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error types for a single stage.
#[derive(thiserror::Error, Debug, Clone)]
pub enum StageError {
    #[error("stage type not found: {0}")]
    NotFound(String),
    #[error("invalid configuration: {0}")]
    BadConfig(String),
    #[error("unexpected input: {0}")]
    BadInput(String),
    #[error(transparent)]
    Montage(#[from] MontageError),
    #[error("IO error: {0}")]
    Io(String),
    #[error("JSON serialization/deserialization error: {0}")]
    JsonError(String),
    #[error("CSV error: {0}")]
    CsvError(String),
}

impl From<serde_json::Error> for StageError {
    fn from(err: serde_json::Error) -> Self {
        StageError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for StageError {
    fn from(err: std::io::Error) -> Self {
        StageError::Io(err.to_string())
    }
}

impl From<csv::Error> for StageError {
    fn from(err: csv::Error) -> Self {
        StageError::CsvError(err.to_string())
    }
}
