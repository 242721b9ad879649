// Container runtime capability and the docker CLI implementation

use crate::sandbox::config::SandboxConfig;
use crate::sandbox::error::{ExecutionError, Result};
use crate::sandbox::types::{ContainerOutput, ContainerRequest};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Something that can run a [`ContainerRequest`] to completion
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Runtime name for logs and errors
    fn name(&self) -> &str;

    /// Start the container, wait for it to exit and return its output
    async fn run(&self, request: &ContainerRequest) -> Result<ContainerOutput>;

    /// Make `image` available locally before the first run
    async fn pull(&self, _image: &str) -> Result<()> {
        Ok(())
    }
}

/// Read at most `limit` bytes, then discard the rest until EOF so the
/// writer never blocks on a full pipe. Returns the kept bytes and the total length.
async fn read_capped<R>(reader: &mut R, limit: u64) -> std::io::Result<(Vec<u8>, u64)>
where
    R: AsyncRead + Unpin,
{
    let mut kept = Vec::new();
    (&mut *reader).take(limit).read_to_end(&mut kept).await?;
    let dropped = tokio::io::copy(reader, &mut tokio::io::sink()).await?;
    let total = kept.len() as u64 + dropped;
    Ok((kept, total))
}

/// `docker run` argument vector for a request
pub fn docker_args(request: &ContainerRequest) -> Vec<String> {
    let mut args: Vec<String> = vec!["run".into(), "--rm".into()];

    args.push("--name".into());
    args.push(request.name.clone());

    if request.network_disabled {
        args.push("--net".into());
        args.push("none".into());
    }

    args.push("-m".into());
    args.push(format!("{}M", request.memory_mb));

    args.push("-w".into());
    args.push(request.workdir.clone());

    for mount in &request.mounts {
        let mode = if mount.read_only { ":ro" } else { "" };
        args.push("-v".into());
        args.push(format!("{}:{}{}", mount.source.display(), mount.target, mode));
    }

    args.push(request.image.clone());
    args.extend(request.command.iter().cloned());
    args
}

/// Runs sandboxes through the docker (or a CLI-compatible) client
pub struct DockerRuntime {
    binary: String,
    output_limit_bytes: u64,
}

impl DockerRuntime {
    pub fn new(config: &SandboxConfig) -> Self {
        Self {
            binary: config.runtime_binary.clone(),
            output_limit_bytes: config.output_limit_bytes,
        }
    }

    /// Kill the client and force-remove the container it started
    async fn force_stop(&self, child: &mut Child, name: &str) {
        if let Err(e) = child.kill().await {
            warn!(container = %name, error = %e, "failed to kill runtime client");
        }

        match Command::new(&self.binary)
            .args(["rm", "-f", name])
            .stdin(Stdio::null())
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                debug!(container = %name, "container force-removed");
            }
            Ok(output) => warn!(
                container = %name,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "container removal failed"
            ),
            Err(e) => warn!(container = %name, error = %e, "container removal failed"),
        }
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    fn name(&self) -> &str {
        &self.binary
    }

    async fn run(&self, request: &ContainerRequest) -> Result<ContainerOutput> {
        let start = Instant::now();
        let args = docker_args(request);

        debug!(runtime = %self.binary, args = ?args, "spawning sandbox");

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::SpawnFailed {
                runtime: self.binary.clone(),
                source,
            })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecutionError::OutputCaptureFailed("stdout not piped".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExecutionError::OutputCaptureFailed("stderr not piped".into()))?;

        // Both pipes drain concurrently so neither can fill up and stall the container
        let limit = self.output_limit_bytes;
        let collect = async {
            let (out_read, err_read) = tokio::join!(
                read_capped(&mut stdout, limit),
                read_capped(&mut stderr, limit)
            );
            let (out, out_total) = out_read?;
            let (err, err_total) = err_read?;
            if out_total > limit || err_total > limit {
                warn!(
                    container = %request.name,
                    stdout_bytes = out_total,
                    stderr_bytes = err_total,
                    limit_bytes = limit,
                    "sandbox output truncated"
                );
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((out, err, status))
        };

        let waited = match request.deadline {
            Some(limit) => tokio::time::timeout(limit, collect).await.ok(),
            None => Some(collect.await),
        };

        let (out, err, status) = match waited {
            Some(collected) => collected?,
            None => {
                let secs = request.deadline.map(|d| d.as_secs()).unwrap_or_default();
                warn!(container = %request.name, deadline_secs = secs, "sandbox deadline exceeded");
                self.force_stop(&mut child, &request.name).await;
                return Err(ExecutionError::DeadlineExceeded(secs));
            }
        };

        let output = ContainerOutput {
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
            exit_code: status.code().unwrap_or(-1),
        };

        info!(
            container = %request.name,
            image = %request.image,
            exit_code = output.exit_code,
            stdout_bytes = out.len(),
            stderr_bytes = err.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "sandbox exited"
        );

        Ok(output)
    }

    async fn pull(&self, image: &str) -> Result<()> {
        let start = Instant::now();
        let output = Command::new(&self.binary)
            .args(["pull", image])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ExecutionError::SpawnFailed {
                runtime: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecutionError::PullFailed {
                image: image.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!(
            image = %image,
            duration_ms = start.elapsed().as_millis() as u64,
            "image pulled"
        );
        Ok(())
    }
}
