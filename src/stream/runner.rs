//! External command invocation.
//!
//! Running a command and judging its exit status are separate steps: a
//! runner only reports the status, the caller decides whether a failure
//! is fatal.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::StreamError;

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code; `None` if terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Trait for running an argument vector to completion
#[async_trait]
pub trait CommandRunner: Send {
    /// Run `argv[0]` with the remaining arguments and wait for it
    async fn run(&mut self, argv: &[String]) -> Result<CommandStatus, StreamError>;
}

/// Runs commands as child processes sharing our stdio
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&mut self, argv: &[String]) -> Result<CommandStatus, StreamError> {
        let (program, args) = argv.split_first().ok_or(StreamError::EmptyCommand)?;

        tracing::debug!("Running {} with {} argument(s)", program, args.len());

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| StreamError::Spawn {
                program: program.clone(),
                source,
            })?;

        Ok(status.into())
    }
}
