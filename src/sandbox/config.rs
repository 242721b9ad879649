// Sandbox configuration

use crate::profile::SnippetsConfig;

/// Fixed sandbox policy knobs
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Container runtime binary
    pub runtime_binary: String,
    /// In-sandbox mount point of the staging directory, also the working directory
    pub mount_point: String,
    /// Container name prefix, the job id is appended
    pub name_prefix: String,
    /// Added to the timeout bound to form the outer deadline (0 disables it)
    pub deadline_grace_secs: u64,
    /// Outer deadline when the timeout spec has no numeric bound
    pub fallback_deadline_secs: u64,
    /// Bytes kept per output stream; the rest is read and discarded
    pub output_limit_bytes: u64,
    /// Pull every registered image at startup
    pub prefetch_images: bool,
}

impl SandboxConfig {
    /// Take deadline settings from the snippet runner config
    pub fn from_snippets(snippets: &SnippetsConfig) -> Self {
        Self {
            deadline_grace_secs: snippets.deadline_grace_secs,
            fallback_deadline_secs: snippets.fallback_deadline_secs,
            output_limit_bytes: snippets.output_limit_bytes,
            prefetch_images: snippets.prefetch_images,
            ..Default::default()
        }
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            runtime_binary: String::from("docker"),
            mount_point: String::from("/local"),
            name_prefix: String::from("snipbot"),
            deadline_grace_secs: 5,
            fallback_deadline_secs: 60,
            output_limit_bytes: 64 * 1024,
            prefetch_images: true,
        }
    }
}
