//! Spawns, monitors, times out, and reaps a single external process.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::time;
use tracing::{debug, warn};
use which::which;

use crate::error::Error;

/// CPU seconds granted to a supervised child, enforced via rlimit.
const CPU_SECONDS_LIMIT: u64 = 10;
/// Largest file a supervised child may write (compiled artifacts included).
const OUTPUT_FILE_LIMIT: u64 = 10 * 1024 * 1024;

/// Exit code and fully drained streams of a finished child process.
#[derive(Debug)]
pub(crate) struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `command` with `args`, racing its exit against `timeout`.
///
/// Stdout and stderr are drained continuously so the child can never block on
/// a full pipe. On expiry the child is killed and the call fails with
/// [`Error::Timeout`]; partial output is never returned. A command that
/// cannot be resolved or spawned fails with [`Error::Spawn`], distinct from a
/// non-zero exit, which is reported through `exit_code` for the caller to
/// classify.
pub(crate) async fn supervise(
    command: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<ProcessOutput, Error> {
    let resolved =
        which(command).map_err(|_| Error::Spawn(format!("command not found: {command}")))?;

    let mut cmd = Command::new(&resolved);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    #[cfg(unix)]
    unsafe {
        use nix::sys::resource::{setrlimit, Resource};
        cmd.pre_exec(|| {
            setrlimit(Resource::RLIMIT_CPU, CPU_SECONDS_LIMIT, CPU_SECONDS_LIMIT)
                .map_err(|e| std::io::Error::other(format!("failed to set CPU limit: {e}")))?;
            setrlimit(Resource::RLIMIT_FSIZE, OUTPUT_FILE_LIMIT, OUTPUT_FILE_LIMIT)
                .map_err(|e| std::io::Error::other(format!("failed to set file size limit: {e}")))?;
            Ok(())
        });
    }

    debug!(command, ?args, "spawning process");
    let mut child = cmd
        .spawn()
        .map_err(|e| Error::Spawn(format!("failed to spawn {command}: {e}")))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| Error::Internal("child stdout was not captured".to_string()))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| Error::Internal("child stderr was not captured".to_string()))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    let status = match time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            return Err(Error::Internal(format!(
                "failed waiting for {command}: {e}"
            )))
        }
        Err(_) => {
            warn!(
                command,
                timeout_ms = timeout.as_millis() as u64,
                "process exceeded deadline, killing"
            );
            if let Err(e) = child.kill().await {
                warn!(command, "failed to kill timed out process: {e}");
            }
            stdout_task.abort();
            stderr_task.abort();
            return Err(Error::Timeout(timeout.as_millis() as u64));
        }
    };

    let stdout = stdout_task
        .await
        .map_err(|e| Error::Internal(format!("stdout reader failed: {e}")))?;
    let stderr = stderr_task
        .await
        .map_err(|e| Error::Internal(format!("stderr reader failed: {e}")))?;

    // Killed-by-signal has no exit code; report it as a generic failure code.
    let exit_code = status.code().unwrap_or(-1);
    debug!(command, exit_code, "process finished");

    Ok(ProcessOutput {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}
