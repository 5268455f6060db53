//! Subprocess execution for CLI tools.
//!
//! Runs a program with piped stdout/stderr under a wall-clock timeout. The child
//! is spawned with `kill_on_drop`, so abandoning the wait on timeout kills it.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::provider::ERROR_EXCERPT_CHARS;

/// Exit code reported for timeouts, spawn failures and signal deaths.
pub const FAILED_EXIT_CODE: i32 = -1;

/// Captured result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RawOutput {
    /// Sentinel for a run that exceeded its timeout: `(-1, "", "timeout")`.
    pub fn timeout() -> Self {
        Self::failed("timeout")
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            exit_code: FAILED_EXIT_CODE,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn is_timeout(&self) -> bool {
        self.exit_code == FAILED_EXIT_CODE && self.stderr == "timeout"
    }
}

/// Launches external commands. One call is exactly one process launch.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String], timeout: Duration) -> RawOutput;
}

/// Tokio-backed runner used outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], timeout: Duration) -> RawOutput {
        debug!(program = program, args = ?args, "running CLI");

        let child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(program = program, error = %e, "failed to spawn CLI");
                return RawOutput::failed(format!("failed to spawn '{program}': {e}"));
            }
        };

        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(program = program, error = %e, "failed to collect CLI output");
                return RawOutput::failed(format!("failed to wait for '{program}': {e}"));
            }
            Err(_) => {
                warn!(
                    program = program,
                    timeout_secs = timeout.as_secs_f64(),
                    "CLI timed out"
                );
                return RawOutput::timeout();
            }
        };

        let exit_code = output.status.code().unwrap_or(FAILED_EXIT_CODE);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        debug!(program = program, exit_code = exit_code, "CLI finished");
        if exit_code != 0 {
            warn!(
                program = program,
                exit_code = exit_code,
                stderr = excerpt(&stderr, ERROR_EXCERPT_CHARS),
                "CLI exited with non-zero status"
            );
        }

        RawOutput {
            exit_code,
            stdout,
            stderr,
        }
    }
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
