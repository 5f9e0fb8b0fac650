use std::path::PathBuf;

use thiserror::Error;

use crate::compute::Operation;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Buffer error: {0}")]
    BufferError(String),

    #[error("Cannot compute {0} of an empty matrix")]
    EmptyReduction(&'static str),

    #[error("Session error: {0}")]
    Session(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{backend} backend failed during {operation}: {source}")]
    Operation {
        backend: &'static str,
        operation: Operation,
        #[source]
        source: Box<BenchError>,
    },

    #[error("No results for backend {backend} at {}", .path.display())]
    MissingResults { backend: String, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Plot error: {0}")]
    Plot(String),
}

impl BenchError {
    /// Tags an error with the backend and operation it came from.
    pub fn in_operation(backend: &'static str, operation: Operation, source: BenchError) -> Self {
        BenchError::Operation {
            backend,
            operation,
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
