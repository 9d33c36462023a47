use std::time::Duration;
use tokio::runtime::Handle;
use tracing::trace;

use crate::core::Dataset;
use crate::playback::{PlaybackConfig, PlaybackDriver, PlaybackSummary, TickOutcome, TickScheduler};

/// A playback driver paired with the timer that advances it
pub struct PlaybackSession {
    driver: PlaybackDriver,
    scheduler: TickScheduler,
}

impl PlaybackSession {
    pub fn new(runtime: Handle, dataset: Dataset, config: PlaybackConfig) -> Self {
        Self {
            driver: PlaybackDriver::new(dataset, config.terminal),
            scheduler: TickScheduler::new(runtime, config.interval()),
        }
    }

    pub fn driver(&self) -> &PlaybackDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut PlaybackDriver {
        &mut self.driver
    }

    pub fn interval(&self) -> Option<Duration> {
        self.scheduler.interval()
    }

    /// Change the tick interval; the cursor is unaffected
    pub fn set_interval(&mut self, interval: Option<Duration>) {
        self.scheduler.set_interval(interval);
    }

    /// Feed every tick that is already due to the driver.
    ///
    /// Returns the summary when the run finished during this call; the caller
    /// is expected to clear its playing flag in response.
    pub fn pump(&mut self) -> Option<PlaybackSummary> {
        let mut finished = None;
        while let Some(tick) = self.scheduler.try_tick() {
            match self.driver.tick() {
                TickOutcome::Advanced(sample) => {
                    trace!("Tick {} showed sample {}", tick.sequence, sample.index);
                }
                TickOutcome::StopRequested(summary) => finished = Some(summary),
                TickOutcome::Idle | TickOutcome::Waiting => {}
            }
        }
        finished
    }
}
