pub mod engine;
pub mod scheduler;
pub mod session;

pub use engine::PlaybackDriver;
pub use scheduler::{Tick, TickScheduler};
pub use session::PlaybackSession;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::DisplaySample;

/// Cursor value at which playback is declared finished
pub const DEFAULT_TERMINAL_INDEX: usize = 999;

/// Default tick interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 30;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Exhausted,
}

/// Where playback stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalIndex {
    /// Stop at a fixed cursor value regardless of the dataset length
    Fixed(usize),
    /// Stop once every sample has been shown
    DatasetLength,
}

impl Default for TerminalIndex {
    fn default() -> Self {
        TerminalIndex::Fixed(DEFAULT_TERMINAL_INDEX)
    }
}

impl TerminalIndex {
    /// Resolve against a dataset holding `len` samples
    pub fn resolve(&self, len: usize) -> usize {
        match self {
            TerminalIndex::Fixed(index) => *index,
            TerminalIndex::DatasetLength => len,
        }
    }
}

/// Playback configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Tick interval in milliseconds, `None` disables the timer
    pub interval_ms: Option<u64>,
    pub terminal: TerminalIndex,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: Some(DEFAULT_INTERVAL_MS),
            terminal: TerminalIndex::default(),
        }
    }
}

impl PlaybackConfig {
    pub fn interval(&self) -> Option<Duration> {
        self.interval_ms.map(Duration::from_millis)
    }
}

/// Result of feeding one tick to the driver
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Not playing, or the run already finished
    Idle,
    /// Playing but nothing is loaded yet
    Waiting,
    /// The cursor moved forward and a new sample was published
    Advanced(DisplaySample),
    /// The run finished; the caller should stop playback
    StopRequested(PlaybackSummary),
}

/// What a finished run looked like
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSummary {
    /// Cursor value when the run stopped
    pub samples_played: usize,
    pub dataset_len: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PlaybackSummary {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
