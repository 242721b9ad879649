// Slack module - chat platform boundary (Web API client and event model)
#![allow(unused_imports)]

pub mod client;
pub mod error;
pub mod platform;
pub mod types;

pub use client::SlackClient;
pub use error::PlatformError;
pub use platform::ChatPlatform;
pub use types::{MessageEvent, PlatformEvent, ReactionEvent, ReactionItem, SharedFile};

/// Slack Web API configuration
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Web API base URL
    pub api_base: String,
    /// Bot token, also used for private file downloads
    pub token: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl SlackConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_base: "https://slack.com/api".to_string(),
            token: token.into(),
            request_timeout_secs: 30,
        }
    }
}
