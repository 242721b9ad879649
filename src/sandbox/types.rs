// Data types for Sandbox module

use std::path::PathBuf;
use std::time::Duration;

/// Notice appended to the reply when the snippet exits non-zero
pub const FAILURE_NOTICE: &str = "Your snippet failed with exit code:";

/// Host directory bound into the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub source: PathBuf,
    pub target: String,
    pub read_only: bool,
}

/// Everything a runtime needs to start one sandbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRequest {
    /// Container name, unique per job
    pub name: String,
    pub image: String,
    pub memory_mb: u64,
    pub network_disabled: bool,
    pub workdir: String,
    pub mounts: Vec<Mount>,
    /// Command line run inside the container
    pub command: Vec<String>,
    /// Outer wall-clock deadline enforced by the runtime
    pub deadline: Option<Duration>,
}

/// Raw result of a container run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerOutput {
    pub stdout: String,
    pub stderr: String,
    /// Process exit code, -1 when terminated by a signal
    pub exit_code: i32,
}

/// Outcome of a snippet run, success or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// stdout lines joined with `;`
    pub combined_output: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecutionResult {
    pub fn from_output(output: ContainerOutput) -> Self {
        let combined_output = output.stdout.lines().collect::<Vec<_>>().join(";");
        Self {
            combined_output,
            stderr: output.stderr,
            exit_code: output.exit_code,
        }
    }

    pub fn failed(&self) -> bool {
        self.exit_code > 0
    }

    /// Output (or stderr when there is none), plus a failure notice on non-zero exit
    pub fn reply_text(&self) -> String {
        let body = if self.combined_output.is_empty() {
            self.stderr.trim_end_matches(['\n', '\r'])
        } else {
            self.combined_output.as_str()
        };

        let mut parts = vec![body.to_string()];
        if self.failed() {
            parts.push(format!("{} {}", FAILURE_NOTICE, self.exit_code));
        }
        parts.join("\n")
    }
}
