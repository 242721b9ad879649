// Bot errors

use crate::fetch::DownloadError;
use crate::sandbox::ExecutionError;
use crate::slack::PlatformError;
use crate::staging::PersistError;
use thiserror::Error;

/// Why a snippet job stopped before producing output.
/// The message is sent to the user verbatim.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Startup errors of the bot
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Invalid command pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Chat platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration missing: {0}")]
    Missing(String),
}
