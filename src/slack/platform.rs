// Chat platform capability

use crate::slack::error::PlatformError;
use crate::slack::types::SharedFile;
use async_trait::async_trait;

/// Calls the bot makes back into the chat platform
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// User id of the bot itself
    async fn identity(&self) -> Result<String, PlatformError>;

    /// Attach a comment to a shared file
    async fn comment_on_file(&self, file_id: &str, text: &str) -> Result<(), PlatformError>;

    /// React to a shared file
    async fn add_reaction(&self, file_id: &str, reaction: &str) -> Result<(), PlatformError>;

    /// Canonical record of a shared file
    async fn file_info(&self, file_id: &str) -> Result<SharedFile, PlatformError>;

    /// Post a message to a channel
    async fn post_message(&self, channel: &str, text: &str) -> Result<(), PlatformError>;
}
