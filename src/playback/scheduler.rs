use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Shortest accepted tick interval
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// One timer delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Counts from 1 within one installed timer
    pub sequence: u64,
}

/// Owned handle to a repeating timer.
///
/// Ticks travel through a single-slot channel, so a tick that arrives while
/// the previous one is still unread is dropped instead of queued. Changing
/// the interval replaces the timer and its channel; dropping the handle
/// aborts the timer task.
pub struct TickScheduler {
    runtime: Handle,
    interval: Option<Duration>,
    task: Option<JoinHandle<()>>,
    ticks: Option<mpsc::Receiver<Tick>>,
}

impl TickScheduler {
    /// Create a scheduler and start it if `interval` is set
    pub fn new(runtime: Handle, interval: Option<Duration>) -> Self {
        let mut scheduler = Self {
            runtime,
            interval: interval.map(|i| i.max(MIN_INTERVAL)),
            task: None,
            ticks: None,
        };
        scheduler.install();
        scheduler
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Whether a timer is currently installed
    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Change the interval; `None` cancels the timer.
    ///
    /// The first tick of the new timer arrives one full period from now.
    pub fn set_interval(&mut self, interval: Option<Duration>) {
        let interval = interval.map(|i| i.max(MIN_INTERVAL));
        if interval == self.interval && self.is_active() == interval.is_some() {
            return;
        }

        debug!("Tick interval changed from {:?} to {:?}", self.interval, interval);
        self.cancel();
        self.interval = interval;
        self.install();
    }

    /// Stop delivering ticks until the next `set_interval`
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.ticks = None;
    }

    /// Take a pending tick without waiting
    pub fn try_tick(&mut self) -> Option<Tick> {
        self.ticks.as_mut()?.try_recv().ok()
    }

    /// Wait for the next tick; `None` if no timer is installed
    #[cfg(test)]
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.ticks.as_mut()?.recv().await
    }

    fn install(&mut self) {
        let Some(period) = self.interval else {
            return;
        };

        let (tx, rx) = mpsc::channel(1);
        let task = self.runtime.spawn(async move {
            let mut timer = time::interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut sequence = 0;
            loop {
                timer.tick().await;
                sequence += 1;
                match tx.try_send(Tick { sequence }) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });

        self.task = Some(task);
        self.ticks = Some(rx);
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let mut scheduler = TickScheduler::new(Handle::current(), Some(millis(30)));
        let start = Instant::now();

        let tick = scheduler.next_tick().await.unwrap();
        assert_eq!(tick.sequence, 1);
        assert_eq!(start.elapsed(), millis(30));

        let tick = scheduler.next_tick().await.unwrap();
        assert_eq!(tick.sequence, 2);
        assert_eq!(start.elapsed(), millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_starts_fresh_period() {
        let mut scheduler = TickScheduler::new(Handle::current(), Some(millis(10)));
        scheduler.next_tick().await.unwrap();

        scheduler.set_interval(Some(millis(25)));
        let changed_at = Instant::now();

        let tick = scheduler.next_tick().await.unwrap();
        assert_eq!(tick.sequence, 1);
        assert_eq!(changed_at.elapsed(), millis(25));

        scheduler.next_tick().await.unwrap();
        assert_eq!(changed_at.elapsed(), millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_delivery() {
        let mut scheduler = TickScheduler::new(Handle::current(), Some(millis(10)));
        scheduler.next_tick().await.unwrap();

        scheduler.set_interval(None);
        assert!(!scheduler.is_active());
        assert_eq!(scheduler.next_tick().await, None);

        time::sleep(millis(100)).await;
        assert_eq!(scheduler.try_tick(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unread_ticks_are_dropped() {
        let mut scheduler = TickScheduler::new(Handle::current(), Some(millis(10)));

        // Several periods pass without anyone reading
        time::sleep(millis(55)).await;

        let first = scheduler.try_tick().unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(scheduler.try_tick(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_interval_is_noop() {
        let mut scheduler = TickScheduler::new(Handle::current(), Some(millis(10)));
        let start = Instant::now();
        time::sleep(millis(5)).await;

        scheduler.set_interval(Some(millis(10)));
        scheduler.next_tick().await.unwrap();
        assert_eq!(start.elapsed(), millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_interval_never_ticks() {
        let mut scheduler = TickScheduler::new(Handle::current(), None);
        assert!(!scheduler.is_active());
        assert_eq!(scheduler.next_tick().await, None);

        scheduler.set_interval(Some(millis(10)));
        assert!(scheduler.is_active());
        assert!(scheduler.next_tick().await.is_some());
    }
}
