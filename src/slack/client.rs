// Slack Web API client

use super::{ChatPlatform, PlatformError, SharedFile, SlackConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
struct AuthTest {
    user_id: String,
}

#[derive(Deserialize)]
struct FileInfo {
    file: SharedFile,
}

/// Web API client authenticated with the bot token
#[derive(Clone)]
pub struct SlackClient {
    config: SlackConfig,
    client: Client,
}

impl SlackClient {
    pub fn new(config: SlackConfig) -> Result<Self, PlatformError> {
        info!(api_base = %config.api_base, "initializing slack client");

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), method)
    }

    /// Unwrap the `{ok, error}` envelope every method returns
    fn unwrap_envelope<T: DeserializeOwned>(method: &str, body: Value) -> Result<T, PlatformError> {
        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            let error = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            warn!(method = %method, error = %error, "slack api call rejected");
            return Err(PlatformError::Api {
                method: method.to_string(),
                error,
            });
        }
        Ok(serde_json::from_value(body)?)
    }

    async fn post<T: DeserializeOwned>(&self, method: &str, payload: Value) -> Result<T, PlatformError> {
        debug!(method = %method, "slack api POST");
        let body: Value = self
            .client
            .post(self.url(method))
            .bearer_auth(&self.config.token)
            .json(&payload)
            .send()
            .await?
            .json()
            .await?;
        Self::unwrap_envelope(method, body)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PlatformError> {
        debug!(method = %method, "slack api GET");
        let body: Value = self
            .client
            .get(self.url(method))
            .bearer_auth(&self.config.token)
            .query(query)
            .send()
            .await?
            .json()
            .await?;
        Self::unwrap_envelope(method, body)
    }
}

#[async_trait]
impl ChatPlatform for SlackClient {
    async fn identity(&self) -> Result<String, PlatformError> {
        let auth: AuthTest = self.post("auth.test", json!({})).await?;
        Ok(auth.user_id)
    }

    async fn comment_on_file(&self, file_id: &str, text: &str) -> Result<(), PlatformError> {
        let _: Value = self
            .post("files.comments.add", json!({ "file": file_id, "comment": text }))
            .await?;
        Ok(())
    }

    async fn add_reaction(&self, file_id: &str, reaction: &str) -> Result<(), PlatformError> {
        let _: Value = self
            .post("reactions.add", json!({ "file": file_id, "name": reaction }))
            .await?;
        Ok(())
    }

    async fn file_info(&self, file_id: &str) -> Result<SharedFile, PlatformError> {
        let info: FileInfo = self.get("files.info", &[("file", file_id)]).await?;
        Ok(info.file)
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), PlatformError> {
        let _: Value = self
            .post("chat.postMessage", json!({ "channel": channel, "text": text }))
            .await?;
        Ok(())
    }
}
