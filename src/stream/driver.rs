//! Poll loop feeding a rolling queue to an external command.
//!
//! ```text
//! Priming --(first batch: play head at position, then the rest)--> Steady
//! Steady  --(every batch: play whole queue)--> Steady
//! ```
//!
//! Each iteration waits for the command before polling again; there is no
//! other pacing. A non-zero exit ends the loop with an error.

use tokio::sync::mpsc;

use super::{CommandRunner, StreamError, POSITION_PLACEHOLDER};
use crate::adapters::StreamSource;

/// User command with an optional `{}` position placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    args: Vec<String>,
}

impl CommandTemplate {
    pub fn new(args: impl IntoIterator<Item = impl Into<String>>) -> Result<Self, StreamError> {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return Err(StreamError::EmptyCommand);
        }
        Ok(Self { args })
    }

    /// Arguments with every placeholder replaced by `position`
    pub fn with_position(&self, position: u64) -> Vec<String> {
        self.substitute(&position.to_string())
    }

    /// Arguments for every call after the first: placeholder becomes `0`
    pub fn steady(&self) -> Vec<String> {
        self.substitute("0")
    }

    fn substitute(&self, value: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(POSITION_PLACEHOLDER, value))
            .collect()
    }
}

/// Where the driver is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing played yet; next batch seeks to its position
    Priming,

    /// Playback running; batches are appended as they come
    Steady,
}

/// Outcome of a stopped session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Completed iterations
    pub iterations: u64,

    /// Last position reported by the source
    pub position: Option<u64>,
}

pub struct StreamDriver<R> {
    template: CommandTemplate,
    runner: R,
    state: StreamState,
    iterations: u64,
    last_position: Option<u64>,
}

impl<R: CommandRunner> StreamDriver<R> {
    pub fn new(template: CommandTemplate, runner: R) -> Self {
        Self {
            template,
            runner,
            state: StreamState::Priming,
            iterations: 0,
            last_position: None,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn summary(&self) -> StreamSummary {
        StreamSummary {
            iterations: self.iterations,
            position: self.last_position,
        }
    }

    /// Run one poll iteration
    pub async fn step<S>(&mut self, source: &mut S) -> Result<(), StreamError>
    where
        S: StreamSource + ?Sized,
    {
        let batch = source.next_batch().await?;
        self.last_position = Some(batch.position);
        let mut queue = batch.queue.into_iter();

        if self.state == StreamState::Priming {
            let first = queue.next().ok_or(StreamError::EmptyQueue)?;
            tracing::info!("Starting playback at position {}", batch.position);

            let mut argv = self.template.with_position(batch.position);
            argv.push(first);
            self.invoke(&argv).await?;
            self.state = StreamState::Steady;
        }

        let mut argv = self.template.steady();
        let before = argv.len();
        argv.extend(queue);
        tracing::info!("Queueing {} item(s)", argv.len() - before);
        self.invoke(&argv).await?;

        self.iterations += 1;
        Ok(())
    }

    /// Loop until `stop_rx` fires or something fails
    ///
    /// The stop signal is checked between iterations. Any non-zero exit is
    /// fatal. Only a command killed by a signal while a stop is pending (the
    /// player got the same Ctrl+C) counts as a clean stop.
    pub async fn run<S>(
        &mut self,
        source: &mut S,
        stop_rx: &mut mpsc::Receiver<()>,
    ) -> Result<StreamSummary, StreamError>
    where
        S: StreamSource + ?Sized,
    {
        loop {
            if stop_requested(stop_rx) {
                tracing::info!("Stream driver stopping...");
                break;
            }

            match self.step(source).await {
                Ok(()) => {}
                Err(StreamError::CommandKilled { .. }) if stop_requested(stop_rx) => {
                    tracing::info!("Command interrupted, stream driver stopping...");
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(self.summary())
    }

    async fn invoke(&mut self, argv: &[String]) -> Result<(), StreamError> {
        let status = self.runner.run(argv).await?;
        if status.is_success() {
            return Ok(());
        }

        let program = argv.first().cloned().unwrap_or_default();
        match status.code {
            Some(code) => Err(StreamError::CommandFailed { program, code }),
            None => Err(StreamError::CommandKilled { program }),
        }
    }
}

fn stop_requested(stop_rx: &mut mpsc::Receiver<()>) -> bool {
    stop_rx.try_recv().is_ok()
}
