//! Cadence - Restartable fixed-period beat
//!
//! Drives the call duration counter (1 s while active) and ring cues
//! (while incoming). A stopped cadence never yields a beat, so it can sit
//! in a `select!` loop unconditionally.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval};

/// Period of the duration counter
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
pub struct Cadence {
    interval: Option<Interval>,
    beats: u32,
}

impl Cadence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start beating every `period`, first beat one period from now.
    /// Returns `false` if already running.
    pub fn start(&mut self, period: Duration) -> bool {
        if self.interval.is_some() {
            return false;
        }
        // Missed beats are replayed (burst) so the count tracks wall-clock time.
        self.interval = Some(interval_at(Instant::now() + period, period));
        self.beats = 0;
        true
    }

    /// Stop beating. Returns `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        self.interval.take().is_some()
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Beats since the last start
    pub fn beats(&self) -> u32 {
        self.beats
    }

    /// Wait for the next beat and return its number (from 1)
    pub async fn tick(&mut self) -> u32 {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
                self.beats = self.beats.saturating_add(1);
                self.beats
            }
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_beats_once_per_period() {
        let mut cadence = Cadence::new();
        assert!(cadence.start(TICK_INTERVAL));

        let started = Instant::now();
        assert_eq!(cadence.tick().await, 1);
        assert_eq!(started.elapsed(), TICK_INTERVAL);
        assert_eq!(cadence.tick().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_while_running_is_noop() {
        let mut cadence = Cadence::new();
        assert!(cadence.start(TICK_INTERVAL));
        cadence.tick().await;
        assert!(!cadence.start(Duration::from_millis(10)));
        assert_eq!(cadence.beats(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_is_idempotent_and_silences() {
        let mut cadence = Cadence::new();
        assert!(!cadence.stop());

        cadence.start(TICK_INTERVAL);
        assert!(cadence.stop());
        assert!(!cadence.stop());
        assert!(!cadence.is_running());

        let beat = tokio::time::timeout(Duration::from_secs(5), cadence.tick()).await;
        assert!(beat.is_err());
    }
}
