// Bot configuration

use crate::bot::error::ConfigError;
use std::path::PathBuf;
use tracing::warn;

/// Parse an environment variable, logging a warning if the value is present but invalid.
fn parse_env_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(v) => match v.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = name, value = %v, "Invalid env var value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Process-level settings
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot token for the Web API and private downloads
    pub slack_token: String,
    /// Web API base URL
    pub slack_api_base: String,
    /// Intake listen address
    pub listen_addr: String,
    /// Intake listen port
    pub listen_port: u16,
    /// Language registry file
    pub languages_path: PathBuf,
    /// Runtime binary used for sandboxes
    pub container_runtime: String,
}

impl BotConfig {
    /// Load from environment variables (and `.env`)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let slack_token = std::env::var("SLACK_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::Missing("SLACK_TOKEN".into()))?;

        Ok(Self {
            slack_token,
            slack_api_base: std::env::var("SLACK_API_BASE")
                .unwrap_or_else(|_| "https://slack.com/api".to_string()),
            listen_addr: std::env::var("SNIPBOT_LISTEN_ADDR")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            listen_port: parse_env_var("SNIPBOT_LISTEN_PORT", 9800),
            languages_path: parse_env_var("SNIPBOT_LANGUAGES", PathBuf::from("snippets.toml")),
            container_runtime: std::env::var("SNIPBOT_CONTAINER_RUNTIME")
                .unwrap_or_else(|_| "docker".to_string()),
        })
    }
}
