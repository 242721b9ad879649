// Error types for Slack module

use thiserror::Error;

/// Chat platform call failures
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Slack API {method} failed: {error}")]
    Api { method: String, error: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
