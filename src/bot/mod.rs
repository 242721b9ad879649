// Bot module - snippet pipeline, rerun trigger, help commands and dispatch
#![allow(unused_imports)]

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod pipeline;
pub mod types;

pub use commands::Commands;
pub use config::BotConfig;
pub use dispatcher::Bot;
pub use error::{BotError, ConfigError, JobError};
pub use pipeline::SnippetPipeline;
pub use types::{JobReport, JobState, SnippetJob};

/// Name used when logging job failures
pub const PLUGIN_NAME: &str = "snippets";
