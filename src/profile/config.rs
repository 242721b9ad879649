// Language registry configuration

use crate::profile::error::Result;
use crate::profile::types::TimeoutSpec;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Shipped registry, used when no config file is present
const BUILTIN_CONFIG: &str = include_str!("../../snippets.toml");

/// Per-language entry as written in the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageEntry {
    pub command: Option<String>,
    pub image: Option<String>,
    pub timeout: Option<TimeoutSpec>,
    pub memory: Option<u64>,
    pub crop: Option<usize>,
}

/// Snippet runner configuration (`snippets.toml`)
#[derive(Debug, Clone, Deserialize)]
pub struct SnippetsConfig {
    /// Default timeout wrapper arguments
    #[serde(default)]
    pub timeout: TimeoutSpec,
    /// Default memory cap in megabytes
    #[serde(default = "default_memory")]
    pub memory: u64,
    /// Default crop length in characters
    #[serde(default = "default_crop")]
    pub crop: usize,
    /// Staging directory shared with the sandbox
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    /// Reaction that triggers a rerun and acknowledges a submission
    #[serde(default = "default_marker")]
    pub marker_reaction: String,
    /// Keep staged files after execution
    #[serde(default)]
    pub retain_staged: bool,
    /// Slack added to the timeout bound before the container is killed from outside (0 disables)
    #[serde(default = "default_grace")]
    pub deadline_grace_secs: u64,
    /// Outer deadline used when the timeout spec has no readable bound
    #[serde(default = "default_fallback_deadline")]
    pub fallback_deadline_secs: u64,
    /// Bytes of stdout and stderr kept per run
    #[serde(default = "default_output_limit")]
    pub output_limit_bytes: u64,
    /// Pull every image at startup so the first run is not spent downloading it
    #[serde(default = "default_prefetch")]
    pub prefetch_images: bool,
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageEntry>,
}

fn default_memory() -> u64 {
    8
}

fn default_crop() -> usize {
    512
}

fn default_folder() -> PathBuf {
    PathBuf::from("eval")
}

fn default_marker() -> String {
    "repeat".to_string()
}

fn default_grace() -> u64 {
    5
}

fn default_fallback_deadline() -> u64 {
    60
}

fn default_output_limit() -> u64 {
    64 * 1024
}

fn default_prefetch() -> bool {
    true
}

impl SnippetsConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from file, falling back to the shipped registry when the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "language config not found, using built-in registry");
            return Self::from_toml_str(BUILTIN_CONFIG);
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        info!(
            path = %path.display(),
            languages = config.languages.len(),
            "loaded language config"
        );
        Ok(config)
    }
}

impl Default for SnippetsConfig {
    fn default() -> Self {
        Self {
            timeout: TimeoutSpec::default(),
            memory: default_memory(),
            crop: default_crop(),
            folder: default_folder(),
            marker_reaction: default_marker(),
            retain_staged: false,
            deadline_grace_secs: default_grace(),
            fallback_deadline_secs: default_fallback_deadline(),
            output_limit_bytes: default_output_limit(),
            prefetch_images: default_prefetch(),
            languages: BTreeMap::new(),
        }
    }
}
