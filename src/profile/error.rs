// Error types for Profile module

use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{0} is not supported")]
    NotSupported(String),

    #[error("Language '{tag}' is missing required field '{field}'")]
    Incomplete { tag: String, field: &'static str },

    #[error("Failed to read language config: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ProfileError>;
