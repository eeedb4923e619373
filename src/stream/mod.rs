//! Continuous streaming to an external player.
//!
//! The driver polls a [`StreamSource`](crate::adapters::StreamSource) for a
//! fresh queue of ready URLs and hands them to a command such as
//! `mpv --start={} ...`, waiting for it before polling again.

pub mod driver;
pub mod runner;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use driver::{CommandTemplate, StreamDriver, StreamState, StreamSummary};
pub use runner::{CommandRunner, CommandStatus, ProcessRunner};

/// Placeholder replaced by the starting position in the command template
pub const POSITION_PLACEHOLDER: &str = "{}";

/// One poll result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamBatch {
    /// Where in the overall numbered sequence playback should resume
    #[serde(default)]
    pub position: u64,

    /// Ready-to-play sources, in playback order
    #[serde(default)]
    pub queue: Vec<String>,
}

impl StreamBatch {
    pub fn new(position: u64, queue: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            position,
            queue: queue.into_iter().map(Into::into).collect(),
        }
    }
}

/// Errors that end a streaming session
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Not enough arguments: command template is empty")]
    EmptyCommand,

    #[error("Nothing to play: the first batch has an empty queue")]
    EmptyQueue,

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{program}' failed with exit code {code}")]
    CommandFailed { program: String, code: i32 },

    #[error("Command '{program}' was terminated by a signal")]
    CommandKilled { program: String },

    #[error(transparent)]
    Source(#[from] anyhow::Error),
}
