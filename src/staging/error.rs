// Error types for Staging module

use std::path::PathBuf;
use thiserror::Error;

/// Failures while writing a snippet to the staging directory
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to prepare staging directory {path}: {source}")]
    Prepare {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Source stream failed: {0}")]
    Source(std::io::Error),

    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}
