//! Error types for tessera.
//!
//! Per-image classification failures are *not* call-level errors: they show
//! up as absent slots in a [`ResultBatch`](crate::ResultBatch). Only contract
//! violations, configuration problems and caller-side I/O surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for tessera operations.
#[derive(Error, Debug)]
pub enum TesseraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dispatch contract violations
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Image I/O errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Programming-contract violations detected by the dispatcher.
///
/// These fail fast instead of being folded into the result batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A non-empty batch was partitioned across zero workers, or across more
    /// workers than there are jobs.
    #[error("Invalid batch: {jobs} job(s) cannot be split across {workers} worker(s)")]
    InvalidBatch { jobs: usize, workers: usize },

    /// The result storage does not match the job count.
    #[error("Result batch has {actual} slot(s), expected {expected}")]
    ResultSizeMismatch { expected: usize, actual: usize },

    /// A result slot was written twice.
    #[error("Result slot {index} was written more than once")]
    SlotConflict { index: usize },
}

/// Failure reported by a classifier for a single image.
///
/// The dispatcher logs it, leaves the slot absent and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    /// The classifier cannot handle this input (shape, type, content)
    #[error("Unsupported input: {0}")]
    Unsupported(String),

    /// The classifier failed internally
    #[error("Classifier failure: {0}")]
    Internal(String),
}

/// Caller-side image I/O errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Writing a result image failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Result array cannot be rendered as an image
    #[error("Cannot render result with shape {shape:?}")]
    UnsupportedShape { shape: Vec<usize> },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Convenience type alias for tessera results.
pub type Result<T> = std::result::Result<T, TesseraError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
