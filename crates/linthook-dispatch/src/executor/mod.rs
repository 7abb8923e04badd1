//! Running external tools.

mod cancel;
mod options;

pub use cancel::{CancellationToken, CancellationWatcher};
pub use options::{ExecOptions, MAX_OUTPUT_SIZE};

use crate::command::ToolCommand;
use crate::error::{DispatchError, DispatchResult};
use std::future::pending;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info, warn};

/// What a finished tool produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutcome {
    /// Exit code, absent when killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl RawOutcome {
    /// Whether the tool exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) if self.stdout.ends_with('\n') => {
                format!("{}{}", self.stdout, self.stderr)
            }
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }
}

/// Spawns tools and waits for them.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: ExecOptions,
}

impl Executor {
    pub fn new(options: ExecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExecOptions {
        &self.options
    }

    /// Run a command to completion.
    ///
    /// Stdout and stderr are drained concurrently so a chatty tool cannot
    /// block on a full pipe. On timeout or cancellation the child is killed.
    pub async fn run(&self, command: &ToolCommand) -> DispatchResult<RawOutcome> {
        let mut cancel = self.options.cancel.clone();
        if cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            return Err(DispatchError::Cancelled);
        }

        let start = Instant::now();
        debug!(%command, dir = ?command.working_dir, "spawning tool");

        let mut child = command
            .to_tokio()
            .spawn()
            .map_err(|source| DispatchError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let limit = self.options.max_output_size;

        let completion = async {
            let (stdout, stderr) = tokio::try_join!(
                read_capped(stdout, limit),
                read_capped(stderr, limit)
            )?;
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, stdout, stderr))
        };

        let deadline = async {
            match self.options.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => pending().await,
            }
        };

        let cancelled = async {
            match cancel.as_mut() {
                Some(watcher) => watcher.cancelled().await,
                None => pending().await,
            }
        };

        let result = tokio::select! {
            result = completion => Some(result),
            _ = deadline => None,
            _ = cancelled => {
                let _ = child.kill().await;
                warn!(%command, "tool cancelled");
                return Err(DispatchError::Cancelled);
            }
        };

        let (status, stdout, stderr) = match result {
            Some(result) => result?,
            None => {
                let _ = child.kill().await;
                let duration = self.options.timeout.unwrap_or_default();
                warn!(%command, ?duration, "tool timed out");
                return Err(DispatchError::Timeout { duration });
            }
        };

        let outcome = RawOutcome {
            exit_code: status.code(),
            stdout,
            stderr,
            duration: start.elapsed(),
        };

        info!(
            program = %command.program,
            exit_code = ?outcome.exit_code,
            duration_ms = outcome.duration.as_millis() as u64,
            "tool finished"
        );

        Ok(outcome)
    }
}

/// Read a stream to the end, keeping at most `limit` bytes.
///
/// Bytes past the limit are still drained so the child can exit.
async fn read_capped<R>(stream: Option<R>, limit: usize) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(mut stream) = stream else {
        return Ok(String::new());
    };

    let mut content = Vec::new();
    (&mut stream).take(limit as u64).read_to_end(&mut content).await?;
    tokio::io::copy(&mut stream, &mut tokio::io::sink()).await?;

    Ok(String::from_utf8_lossy(&content).into_owned())
}
