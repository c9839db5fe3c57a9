//! Infrastructure implementation of the `CommandRunner` port.
//!
//! Every terraform and az invocation goes through `TokioCommandRunner`, so
//! this is the one place a child process is spawned, drained, and killed.

use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

use crate::application::ports::CommandRunner;
use crate::domain::ProcessError;

/// Production `CommandRunner` on `tokio::process`.
///
/// The child gets a null stdin, so terraform never waits on an interactive
/// prompt. On timeout the child is killed before the error is returned.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, ?args, timeout_secs = timeout.as_secs(), "spawning");
        let started = Instant::now();
        let mut child = spawn(program, args)?;

        let outcome = tokio::time::timeout(timeout, collect(&mut child)).await;
        let Ok(collected) = outcome else {
            let _ = child.kill().await;
            tracing::warn!(program, timeout_secs = timeout.as_secs(), "killed after timeout");
            return Err(ProcessError::TimedOut {
                program: program.to_string(),
                timeout,
            }
            .into());
        };

        let output = collected.with_context(|| format!("waiting for {program}"))?;
        tracing::debug!(
            program,
            code = output.status.code(),
            elapsed_ms = started.elapsed().as_millis(),
            "finished"
        );
        Ok(output)
    }
}

fn spawn(program: &str, args: &[&str]) -> Result<Child> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            ProcessError::Spawn {
                program: program.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
}

/// Wait for exit while draining both pipes; a child writing more than a pipe
/// buffer blocks until it is read.
async fn collect(child: &mut Child) -> std::io::Result<Output> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (status, stdout, stderr) = tokio::join!(child.wait(), read_all(stdout), read_all(stderr));
    Ok(Output {
        status: status?,
        stdout,
        stderr,
    })
}

async fn read_all(pipe: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}
