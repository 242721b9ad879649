// Error types for Sandbox module

use thiserror::Error;

/// The sandbox could not be run to completion.
/// A user program exiting non-zero is not an error.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed to launch sandbox runtime '{runtime}': {source}")]
    SpawnFailed {
        runtime: String,
        source: std::io::Error,
    },

    #[error("Failed to capture sandbox output: {0}")]
    OutputCaptureFailed(String),

    #[error("Failed to pull image {image}: {reason}")]
    PullFailed { image: String, reason: String },

    #[error("Sandbox exceeded the outer deadline of {0} seconds and was killed")]
    DeadlineExceeded(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
