// Event and record types for Slack module

use serde::{Deserialize, Serialize};

/// A shared file as carried by events and `files.info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    pub id: String,
    #[serde(default)]
    pub filetype: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub url_private_download: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Inbound platform event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    Message(MessageEvent),
    ReactionAdded(ReactionEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub file: Option<SharedFile>,
}

impl MessageEvent {
    /// The shared file, if this message is a snippet share
    pub fn shared_snippet(&self) -> Option<&SharedFile> {
        if self.subtype.as_deref() != Some("file_share") {
            return None;
        }
        self.file
            .as_ref()
            .filter(|f| f.mode.as_deref() == Some("snippet"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub user: String,
    pub reaction: String,
    pub item: ReactionItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub file: Option<String>,
}
