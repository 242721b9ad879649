// Job types

use crate::profile::LanguageProfile;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Job lifecycle. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Fetching,
    Staged,
    Executing,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Created => "created",
            JobState::Fetching => "fetching",
            JobState::Staged => "staged",
            JobState::Executing => "executing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One execution request, owned by the task running it
#[derive(Debug, Clone)]
pub struct SnippetJob {
    pub job_id: String,
    pub file_id: String,
    pub source_url: Option<String>,
    pub profile: LanguageProfile,
    pub staging_path: PathBuf,
    pub created_at: DateTime<Utc>,
    state: JobState,
}

impl SnippetJob {
    pub fn new(
        job_id: String,
        file_id: String,
        source_url: Option<String>,
        profile: LanguageProfile,
        staging_path: PathBuf,
    ) -> Self {
        Self {
            job_id,
            file_id,
            source_url,
            profile,
            staging_path,
            created_at: Utc::now(),
            state: JobState::Created,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Move to `next`; terminal states are final
    pub fn advance(&mut self, next: JobState) {
        if self.state.is_terminal() {
            return;
        }
        debug!(job_id = %self.job_id, from = %self.state, to = %next, "job state");
        self.state = next;
    }
}

/// What a finished job did, for logs and tests
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_id: String,
    pub file_id: String,
    pub state: JobState,
    pub staging_path: PathBuf,
    /// Text sent (or attempted) as the file comment
    pub reply: String,
    pub elapsed_ms: i64,
}
