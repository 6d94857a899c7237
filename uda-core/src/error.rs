use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the UDA data pipeline.
///
/// Nothing is retried or masked: every failure propagates to the caller, who is
/// expected to stop the run.
#[derive(Error, Debug)]
pub enum UdaError {
    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read array file: {0}")]
    Npy(String),

    #[error("Malformed dataset file {path:?}: {message}")]
    Format { path: PathBuf, message: String },

    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error("Cannot collate batch: {0}")]
    Collate(String),

    #[error("Data loader worker failed: {0}")]
    WorkerFailed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Array shape error: {0}")]
    Ndarray(#[from] ndarray::ShapeError),
}
