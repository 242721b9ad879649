// Snippet pipeline - fetch, stage, execute, reply

use crate::bot::PLUGIN_NAME;
use crate::bot::error::JobError;
use crate::bot::types::{JobReport, JobState, SnippetJob};
use crate::fetch::{DownloadError, Fetcher, split_download_url};
use crate::profile::{ProfileError, Registry};
use crate::reply::format_result;
use crate::sandbox::{ExecutionResult, SandboxExecutor};
use crate::slack::{ChatPlatform, ReactionEvent, SharedFile};
use crate::staging::{JobIdGenerator, PersistError, StagingStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared, immutable collaborators of every snippet job
pub struct SnippetPipeline {
    registry: Arc<Registry>,
    fetcher: Fetcher,
    staging: StagingStore,
    executor: SandboxExecutor,
    platform: Arc<dyn ChatPlatform>,
    ids: Arc<dyn JobIdGenerator>,
    token: String,
}

impl SnippetPipeline {
    pub fn new(
        registry: Arc<Registry>,
        fetcher: Fetcher,
        staging: StagingStore,
        executor: SandboxExecutor,
        platform: Arc<dyn ChatPlatform>,
        ids: Arc<dyn JobIdGenerator>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            staging,
            executor,
            platform,
            ids,
            token: token.into(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Run a shared snippet end to end.
    ///
    /// Returns `None` when the file type is not runnable; no job is
    /// created and nothing is posted in that case.
    pub async fn run_snippet(&self, file: &SharedFile) -> Option<JobReport> {
        let profile = match self.registry.resolve(&file.filetype) {
            Ok(profile) => profile,
            Err(ProfileError::NotSupported(tag)) => {
                debug!(file_id = %file.id, filetype = %tag, "unsupported file type, ignoring");
                return None;
            }
            Err(e) => {
                error!(plugin = PLUGIN_NAME, file_id = %file.id, error = %e, "language profile unusable");
                return None;
            }
        };

        let job_id = self.ids.next_id();
        let staging_path = self.staging.path_for(&job_id);
        let mut job = SnippetJob::new(
            job_id,
            file.id.clone(),
            file.url_private_download.clone(),
            profile,
            staging_path,
        );

        info!(
            job_id = %job.job_id,
            file_id = %job.file_id,
            language = %job.profile.tag,
            "snippet job created"
        );

        let (_, outcome) = tokio::join!(self.acknowledge(&file.id), self.run_job(&mut job));

        let reply = match outcome {
            Ok(result) => {
                job.advance(JobState::Completed);
                format_result(&result, job.profile.crop_chars)
            }
            Err(e) => {
                job.advance(JobState::Failed);
                error!(plugin = PLUGIN_NAME, job_id = %job.job_id, error = %e, "snippet job failed");
                e.to_string()
            }
        };

        if let Err(e) = self.platform.comment_on_file(&job.file_id, &reply).await {
            error!(plugin = PLUGIN_NAME, job_id = %job.job_id, error = %e, "failed to post reply");
        }

        let elapsed_ms = (Utc::now() - job.created_at).num_milliseconds();
        info!(job_id = %job.job_id, state = %job.state(), elapsed_ms = elapsed_ms, "snippet job finished");

        Some(JobReport {
            job_id: job.job_id.clone(),
            file_id: job.file_id.clone(),
            state: job.state(),
            staging_path: job.staging_path.clone(),
            reply,
            elapsed_ms,
        })
    }

    /// Fetch, stage and execute. Stops at the first failing stage.
    async fn run_job(&self, job: &mut SnippetJob) -> Result<ExecutionResult, JobError> {
        job.advance(JobState::Fetching);
        let url = job.source_url.as_deref().ok_or_else(|| {
            DownloadError::InvalidUrl(format!("file {} has no download URL", job.file_id))
        })?;
        let (host, path) = split_download_url(url)?;
        let source = self.fetcher.fetch(&host, &path, &self.token).await?;

        if let Err(e) = self
            .staging
            .persist(source.into_stream(), &job.staging_path)
            .await
        {
            // A create failure means the path was never ours to remove
            if !matches!(e, PersistError::Create { .. }) {
                self.release(job).await;
            }
            return Err(e.into());
        }
        job.advance(JobState::Staged);

        job.advance(JobState::Executing);
        let outcome = self
            .executor
            .execute(&job.job_id, &job.profile, self.staging.dir())
            .await;

        self.release(job).await;
        outcome.map_err(JobError::from)
    }

    /// Apply the staging retention policy once the sandbox is done with the file
    async fn release(&self, job: &SnippetJob) {
        if self.registry.config().retain_staged {
            return;
        }
        if let Err(e) = self.staging.discard(&job.staging_path).await {
            warn!(job_id = %job.job_id, error = %e, "failed to remove staged snippet");
        }
    }

    /// Best-effort marker reaction on the submission
    async fn acknowledge(&self, file_id: &str) {
        let marker = &self.registry.config().marker_reaction;
        if let Err(e) = self.platform.add_reaction(file_id, marker).await {
            debug!(file_id = %file_id, error = %e, "acknowledgement reaction not added");
        }
    }

    /// Replay the pipeline when the marker reaction is added to a file by
    /// someone other than the bot
    pub async fn rerun(&self, event: &ReactionEvent, bot_id: &str) -> Option<JobReport> {
        if event.reaction != self.registry.config().marker_reaction
            || event.item.kind != "file"
            || event.user == bot_id
        {
            return None;
        }
        let file_id = event.item.file.as_deref()?;

        info!(file_id = %file_id, user = %event.user, "rerun requested");

        match self.platform.file_info(file_id).await {
            Ok(file) => self.run_snippet(&file).await,
            Err(e) => {
                error!(plugin = PLUGIN_NAME, file_id = %file_id, error = %e, "failed to load file for rerun");
                None
            }
        }
    }
}
