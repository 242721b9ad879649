// Error types for Fetch module

use thiserror::Error;

/// Failures while downloading a submitted file
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid download URL: {0}")]
    InvalidUrl(String),

    #[error("Download failed with HTTP {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
