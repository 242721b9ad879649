// Data types for Profile module

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arguments handed to the in-sandbox `timeout` wrapper.
///
/// Either a single bound in seconds or a whitespace separated token list
/// (e.g. `"-s KILL 4"`) that is passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeoutSpec {
    Seconds(u64),
    Args(String),
}

impl TimeoutSpec {
    /// Tokens placed between `timeout` and the runner command
    pub fn args(&self) -> Vec<String> {
        match self {
            TimeoutSpec::Seconds(secs) => vec![secs.to_string()],
            TimeoutSpec::Args(spec) => spec.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Zero and blank specs count as unset
    pub fn is_set(&self) -> bool {
        match self {
            TimeoutSpec::Seconds(secs) => *secs > 0,
            TimeoutSpec::Args(spec) => !spec.trim().is_empty(),
        }
    }

    /// Numeric bound in seconds, if one can be read.
    /// For token lists this is the last plain integer token.
    pub fn bound_secs(&self) -> Option<u64> {
        match self {
            TimeoutSpec::Seconds(secs) => Some(*secs),
            TimeoutSpec::Args(spec) => spec
                .split_whitespace()
                .rev()
                .find_map(|token| token.parse().ok()),
        }
    }
}

impl Default for TimeoutSpec {
    fn default() -> Self {
        TimeoutSpec::Seconds(4)
    }
}

impl fmt::Display for TimeoutSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutSpec::Seconds(secs) => write!(f, "{}", secs),
            TimeoutSpec::Args(spec) => write!(f, "{}", spec.trim()),
        }
    }
}

/// Fully resolved execution profile for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    /// File-type tag this profile was resolved for
    pub tag: String,
    /// Runner invoked inside the sandbox
    pub command: String,
    /// Container image providing the runner
    pub image: String,
    /// Hard memory cap in megabytes
    pub memory_mb: u64,
    /// In-sandbox timeout wrapper arguments
    pub timeout: TimeoutSpec,
    /// Maximum characters returned to the user
    pub crop_chars: usize,
}
