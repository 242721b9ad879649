// Fetch module - downloads submitted source files from the chat platform

pub mod client;
pub mod error;

pub use client::{Fetcher, SourceStream, split_download_url};
pub use error::DownloadError;

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// URL scheme used to reach the file host
    pub scheme: String,
    /// Connect timeout and longest silence while reading, in seconds
    pub request_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            request_timeout_secs: 30,
        }
    }
}
