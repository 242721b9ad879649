// Sandboxed executor - applies the fixed isolation policy to a language profile

use crate::profile::LanguageProfile;
use crate::sandbox::config::SandboxConfig;
use crate::sandbox::error::Result;
use crate::sandbox::runtime::ContainerRuntime;
use crate::sandbox::types::{ContainerRequest, ExecutionResult, Mount};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs staged snippets inside the configured container runtime
#[derive(Clone)]
pub struct SandboxExecutor {
    runtime: Arc<dyn ContainerRuntime>,
    config: SandboxConfig,
}

impl SandboxExecutor {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, config: SandboxConfig) -> Self {
        debug!(
            runtime = runtime.name(),
            mount_point = %config.mount_point,
            deadline_grace_secs = config.deadline_grace_secs,
            "initializing sandbox executor"
        );
        Self { runtime, config }
    }

    /// Outer deadline for a profile, `None` when disabled
    pub fn deadline_for(&self, profile: &LanguageProfile) -> Option<Duration> {
        if self.config.deadline_grace_secs == 0 {
            return None;
        }
        let bound = profile
            .timeout
            .bound_secs()
            .unwrap_or(self.config.fallback_deadline_secs);
        Some(Duration::from_secs(bound + self.config.deadline_grace_secs))
    }

    /// Build the container request: no network, capped memory, staging
    /// directory mounted read-only as the working directory, and the runner
    /// wrapped in `timeout`.
    pub fn build_request(
        &self,
        job_id: &str,
        profile: &LanguageProfile,
        staging_dir: &Path,
    ) -> ContainerRequest {
        let mut command = vec!["timeout".to_string()];
        command.extend(profile.timeout.args());
        command.push(profile.command.clone());
        command.push(job_id.to_string());

        ContainerRequest {
            name: format!("{}-{}", self.config.name_prefix, job_id),
            image: profile.image.clone(),
            memory_mb: profile.memory_mb,
            network_disabled: true,
            workdir: self.config.mount_point.clone(),
            mounts: vec![Mount {
                source: staging_dir.to_path_buf(),
                target: self.config.mount_point.clone(),
                read_only: true,
            }],
            command,
            deadline: self.deadline_for(profile),
        }
    }

    /// Run a staged snippet. Non-zero exits are results, not errors.
    pub async fn execute(
        &self,
        job_id: &str,
        profile: &LanguageProfile,
        staging_dir: &Path,
    ) -> Result<ExecutionResult> {
        let request = self.build_request(job_id, profile, staging_dir);

        info!(
            job_id = %job_id,
            language = %profile.tag,
            image = %profile.image,
            memory_mb = profile.memory_mb,
            timeout = %profile.timeout,
            "executing snippet"
        );

        let output = self.runtime.run(&request).await?;
        Ok(ExecutionResult::from_output(output))
    }

    /// Pull each image ahead of the first run. Failures are logged and
    /// left for `docker run` to retry. Returns the number pulled.
    pub async fn prefetch_images(&self, images: &[String]) -> usize {
        let mut pulled = 0;
        for image in images {
            match self.runtime.pull(image).await {
                Ok(()) => pulled += 1,
                Err(e) => warn!(image = %image, error = %e, "image prefetch failed"),
            }
        }
        info!(pulled = pulled, total = images.len(), "image prefetch finished");
        pulled
    }
}
