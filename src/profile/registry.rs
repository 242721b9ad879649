// Language profile registry

use crate::profile::config::SnippetsConfig;
use crate::profile::error::{ProfileError, Result};
use crate::profile::types::LanguageProfile;
use std::collections::BTreeSet;
use tracing::debug;

/// Immutable snapshot of the supported languages and global defaults
#[derive(Debug, Clone)]
pub struct Registry {
    config: SnippetsConfig,
}

impl Registry {
    pub fn new(config: SnippetsConfig) -> Self {
        debug!(
            languages = config.languages.len(),
            default_timeout = %config.timeout,
            default_memory = config.memory,
            default_crop = config.crop,
            "building language registry"
        );
        Self { config }
    }

    /// Underlying configuration
    pub fn config(&self) -> &SnippetsConfig {
        &self.config
    }

    pub fn is_supported(&self, tag: &str) -> bool {
        self.config.languages.contains_key(tag)
    }

    /// Supported file-type tags, sorted
    pub fn supported(&self) -> Vec<&str> {
        self.config.languages.keys().map(String::as_str).collect()
    }

    /// Distinct images of every resolvable language, sorted
    pub fn images(&self) -> Vec<String> {
        let images: BTreeSet<String> = self
            .config
            .languages
            .keys()
            .filter_map(|tag| self.resolve(tag).ok())
            .map(|profile| profile.image)
            .collect();
        images.into_iter().collect()
    }

    /// Resolve the execution profile for a file-type tag.
    ///
    /// Unset or zero-valued per-language limits fall back to the global
    /// defaults; `command` and `image` have no default.
    pub fn resolve(&self, tag: &str) -> Result<LanguageProfile> {
        let entry = self
            .config
            .languages
            .get(tag)
            .ok_or_else(|| ProfileError::NotSupported(tag.to_string()))?;

        let command = entry
            .command
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or(ProfileError::Incomplete {
                tag: tag.to_string(),
                field: "command",
            })?;
        let image = entry
            .image
            .clone()
            .filter(|i| !i.is_empty())
            .ok_or(ProfileError::Incomplete {
                tag: tag.to_string(),
                field: "image",
            })?;

        let timeout = entry
            .timeout
            .clone()
            .filter(|t| t.is_set())
            .unwrap_or_else(|| self.config.timeout.clone());
        let memory_mb = entry
            .memory
            .filter(|m| *m > 0)
            .unwrap_or(self.config.memory);
        let crop_chars = entry
            .crop
            .filter(|c| *c > 0)
            .unwrap_or(self.config.crop);

        Ok(LanguageProfile {
            tag: tag.to_string(),
            command,
            image,
            memory_mb,
            timeout,
            crop_chars,
        })
    }

    /// Human readable limits of a language, or a not-supported notice
    pub fn describe(&self, tag: &str) -> String {
        match self.resolve(tag) {
            Ok(profile) => format!(
                "{}:\n    Timeout  : {} seconds\n    Memory   : {}MB\n    Crops at : {} characters",
                tag, profile.timeout, profile.memory_mb, profile.crop_chars
            ),
            Err(_) => format!("{} is not supported", tag),
        }
    }
}
