//! Supervision loop for a one-shot watch subprocess.
//!
//! The watch command does one pass and exits; this loop relaunches it
//! after every clean exit and stops when it fails, summarizing whatever
//! the process wrote to stderr along the way.

use anyhow::{Context, Result};
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::errors::A11yprobeError;

/// Stderr prefix emitted by the watch process when page navigation
/// exceeds its 30-second budget.
const NAVIGATION_TIMEOUT_PREFIX: &str = "Navigation timeout of 30000 ms exceeded";

/// How much stderr to keep when summarizing an unrecognized failure.
const STDERR_SUMMARY_LEN: usize = 200;

pub struct WatchOptions {
    /// Program to launch for each one-shot watch pass
    pub command: String,
    pub args: Vec<String>,
    /// Bound on relaunches; `None` supervises until the process fails
    pub max_cycles: Option<u32>,
}

/// Classification of a finished watch pass's stderr output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StderrClass {
    /// Nothing was written to stderr
    Clean,
    /// The watch process reported a page-navigation timeout
    NavigationTimeout,
    /// Anything else, truncated for logging
    Other(String),
}

/// Classify the accumulated stderr of one watch pass.
pub fn classify_stderr(stderr: &str) -> StderrClass {
    if stderr.is_empty() {
        StderrClass::Clean
    } else if stderr.starts_with(NAVIGATION_TIMEOUT_PREFIX) {
        StderrClass::NavigationTimeout
    } else {
        StderrClass::Other(stderr.chars().take(STDERR_SUMMARY_LEN).collect())
    }
}

/// Repeatedly launch the one-shot watch process.
///
/// Relaunches after every zero exit; a nonzero exit stops the loop and
/// surfaces the exit code and stderr summary. Returns the number of
/// completed passes when the cycle bound ends the loop instead.
pub async fn supervise(options: &WatchOptions) -> Result<u32> {
    let mut cycles = 0u32;
    loop {
        if let Some(limit) = options.max_cycles
            && cycles >= limit
        {
            info!("Cycle limit {} reached, stopping supervision", limit);
            return Ok(cycles);
        }

        let (status, stderr) = run_once(options).await?;
        cycles += 1;

        match classify_stderr(&stderr) {
            StderrClass::Clean => {}
            StderrClass::NavigationTimeout => {
                error!("Watcher reported a 30-second navigation timeout");
            }
            StderrClass::Other(summary) => {
                error!("Watcher stderr: {}", summary);
            }
        }

        if status.success() {
            info!("Watcher exited successfully, relaunching");
        } else {
            let code = status.code().unwrap_or(-1);
            warn!("Watcher exited with error code {}", code);
            return Err(A11yprobeError::WatchFailed {
                code,
                stderr: classify_summary(&stderr),
            }
            .into());
        }
    }
}

fn classify_summary(stderr: &str) -> String {
    stderr.chars().take(STDERR_SUMMARY_LEN).collect()
}

async fn run_once(options: &WatchOptions) -> Result<(std::process::ExitStatus, String)> {
    let mut child = Command::new(&options.command)
        .args(&options.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to launch watcher {}", options.command))?;

    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        pipe.read_to_string(&mut stderr)
            .await
            .context("Failed to read watcher stderr")?;
    }
    let status = child
        .wait()
        .await
        .context("Failed to wait for the watcher")?;
    Ok((status, stderr))
}

#[cfg(test)]
#[path = "watch_test.rs"]
mod watch_test;
