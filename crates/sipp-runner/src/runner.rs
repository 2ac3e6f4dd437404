//! Running SIPp and collecting its message trace

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use sipp_trace::{parse_messages_from_log, TraceMessage};

use crate::command::SippCommand;
use crate::config::SippConfig;
use crate::error::{Error, Result};

/// Exit code reported when a run is stopped by its timeout, as `timeout(1)` does
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// How a SIPp process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Exit code 0: every call succeeded
    Completed,
    /// Killed after the configured timeout
    TimedOut,
    /// Any other exit code (SIPp uses 1 for failed calls, 255 for fatal errors)
    Failed(i32),
}

impl RunStatus {
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            0 => RunStatus::Completed,
            TIMEOUT_EXIT_CODE => RunStatus::TimedOut,
            other => RunStatus::Failed(other),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::TimedOut => write!(f, "timed out"),
            RunStatus::Failed(code) => write!(f, "failed with exit code {}", code),
        }
    }
}

/// Result of one SIPp process run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub exit_code: i32,
    pub command_line: String,
}

impl RunOutcome {
    pub fn status(&self) -> RunStatus {
        RunStatus::from_exit_code(self.exit_code)
    }

    pub fn is_success(&self) -> bool {
        self.status() == RunStatus::Completed
    }
}

/// Spawns `command` and waits up to `limit` for it to exit.
///
/// On expiry the child is killed and [`TIMEOUT_EXIT_CODE`] is returned. A
/// child ended by a signal reports `128 + signal` on Unix.
pub async fn run_with_timeout(mut command: Command, limit: Duration) -> Result<i32> {
    let program = command.as_std().get_program().to_string_lossy().into_owned();
    let mut child = command.spawn().map_err(|source| Error::Spawn {
        program: program.clone(),
        source,
    })?;

    let waited = tokio::time::timeout(limit, child.wait()).await;
    match waited {
        Ok(status) => {
            let status = status?;
            debug!("{} exited with {}", program, status);
            Ok(exit_code(status))
        }
        Err(_) => {
            warn!("{} still running after {:?}, killing it", program, limit);
            if let Err(e) = child.kill().await {
                warn!("Failed to kill {}: {}", program, e);
            }
            Ok(TIMEOUT_EXIT_CODE)
        }
    }
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Something that can execute a SIPp configuration
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, config: &SippConfig) -> Result<RunOutcome>;
}

/// Runs the real SIPp binary named by the configuration
#[derive(Debug, Clone, Default)]
pub struct SippRunner;

impl SippRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for SippRunner {
    async fn run(&self, config: &SippConfig) -> Result<RunOutcome> {
        let command = SippCommand::from_config(config)?;
        let command_line = command.command_line();

        if let Some(parent) = config
            .message_file
            .as_deref()
            .and_then(|path| path.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        info!("Running {}", command_line);
        let exit_code = run_with_timeout(command.to_command(), config.timeout).await?;
        let outcome = RunOutcome {
            exit_code,
            command_line,
        };
        info!("SIPp {}", outcome.status());
        Ok(outcome)
    }
}

/// A completed run together with the messages it traced
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub outcome: RunOutcome,
    pub messages: Vec<TraceMessage>,
}

/// Runs `config` and parses the message trace it produced.
///
/// A run that does not complete gracefully is an [`Error::RunFailed`]; the
/// configuration must name a `message_file`.
pub async fn run_scenario<R>(runner: &R, config: &SippConfig) -> Result<ScenarioRun>
where
    R: ProcessRunner + ?Sized,
{
    let message_file = config.message_file.clone().ok_or_else(|| {
        Error::InvalidConfig("a message file is required to collect the trace".to_string())
    })?;

    let outcome = runner.run(config).await?;
    let status = outcome.status();
    if status != RunStatus::Completed {
        return Err(Error::RunFailed {
            status,
            command_line: outcome.command_line,
        });
    }

    let messages = parse_messages_from_log(&message_file)?;
    debug!("Collected {} messages from {}", messages.len(), message_file.display());
    Ok(ScenarioRun { outcome, messages })
}
