use crate::core::{Dataset, DisplaySample};
use crate::playback::{PlaybackState, PlaybackSummary, TerminalIndex, TickOutcome};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info};

/// Steps a cursor through a loaded dataset, one sample per tick
pub struct PlaybackDriver {
    dataset: Dataset,
    terminal: TerminalIndex,
    state: PlaybackState,
    playing: bool,
    cursor: usize,
    summary_visible: bool,
    last_summary: Option<PlaybackSummary>,
    run_started_at: Option<DateTime<Utc>>,
    publisher: watch::Sender<DisplaySample>,
}

impl PlaybackDriver {
    pub fn new(dataset: Dataset, terminal: TerminalIndex) -> Self {
        let (publisher, _) = watch::channel(DisplaySample::default());
        Self {
            dataset,
            terminal,
            state: PlaybackState::Idle,
            playing: false,
            cursor: 0,
            summary_visible: false,
            last_summary: None,
            run_started_at: None,
            publisher,
        }
    }

    /// Receive every published sample
    pub fn subscribe(&self) -> watch::Receiver<DisplaySample> {
        self.publisher.subscribe()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn set_terminal(&mut self, terminal: TerminalIndex) {
        self.terminal = terminal;
    }

    /// Whether the end-of-journey summary should be shown
    pub fn summary_visible(&self) -> bool {
        self.summary_visible
    }

    pub fn last_summary(&self) -> Option<&PlaybackSummary> {
        self.last_summary.as_ref()
    }

    /// Acknowledge the summary
    pub fn close_summary(&mut self) {
        self.summary_visible = false;
    }

    /// Mirror the caller's playing flag.
    ///
    /// Every transition resets the cursor and clears the published sample.
    pub fn set_playing(&mut self, playing: bool) {
        if playing == self.playing {
            return;
        }

        self.playing = playing;
        self.cursor = 0;
        self.publish(DisplaySample::default());

        if playing {
            self.state = PlaybackState::Playing;
            self.run_started_at = Some(Utc::now());
            info!("Playback started ({} samples loaded)", self.dataset.len());
        } else {
            self.state = PlaybackState::Idle;
            self.run_started_at = None;
            info!("Playback stopped");
        }
    }

    /// Swap the dataset. The cursor is left where it is.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        debug!("Dataset replaced ({} samples, cursor {})", dataset.len(), self.cursor);
        self.dataset = dataset;
    }

    /// Handle one timer tick
    pub fn tick(&mut self) -> TickOutcome {
        if !self.playing || self.state != PlaybackState::Playing {
            return TickOutcome::Idle;
        }

        let series = match &self.dataset {
            Dataset::Loaded(series) => series,
            // Nothing has been shown yet, keep waiting for data
            Dataset::NotLoaded if self.cursor == 0 => return TickOutcome::Waiting,
            Dataset::NotLoaded => return self.exhaust(),
        };

        if self.cursor >= self.terminal.resolve(series.len()) {
            return self.exhaust();
        }

        let Some(raw) = series.sample(self.cursor) else {
            return self.exhaust();
        };

        self.cursor += 1;
        let sample = raw.to_display(self.cursor);
        self.publish(sample.clone());
        TickOutcome::Advanced(sample)
    }

    fn exhaust(&mut self) -> TickOutcome {
        let finished_at = Utc::now();
        let summary = PlaybackSummary {
            samples_played: self.cursor,
            dataset_len: self.dataset.len(),
            started_at: self.run_started_at.unwrap_or(finished_at),
            finished_at,
        };

        info!(
            "Playback exhausted at index {} of {} samples",
            summary.samples_played, summary.dataset_len
        );

        self.state = PlaybackState::Exhausted;
        self.summary_visible = true;
        self.last_summary = Some(summary.clone());
        TickOutcome::StopRequested(summary)
    }

    fn publish(&self, sample: DisplaySample) {
        self.publisher.send_replace(sample);
    }
}
