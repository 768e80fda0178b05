//! Restartable countdown.
//!
//! Time is passed in explicitly, so the timer never reads the clock itself.

use std::time::{Duration, Instant};

/// A countdown that runs from the last (re)start for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    duration: Duration,
    started_at: Option<Instant>,
}

impl Timer {
    /// Create a stopped timer.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: None,
        }
    }

    /// Length of the countdown.
    #[must_use]
    pub const fn duration(&self) -> Duration { self.duration }

    /// Start the countdown from `now`, restarting it if it was running.
    pub const fn restart(&mut self, now: Instant) { self.started_at = Some(now); }

    /// Stop the countdown.
    pub const fn abort(&mut self) { self.started_at = None; }

    /// Time left before the countdown finishes, `None` if it is not running.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let elapsed = now.saturating_duration_since(self.started_at?);
        self.duration.checked_sub(elapsed).filter(|left| !left.is_zero())
    }

    /// Check if the countdown is running at `now`.
    #[must_use]
    pub fn is_running(&self, now: Instant) -> bool { self.remaining(now).is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_stopped() {
        let timer = Timer::new(Duration::from_secs(10));
        assert!(!timer.is_running(Instant::now()));
        assert_eq!(timer.duration(), Duration::from_secs(10));
    }

    #[test]
    fn test_timer_runs_until_duration_elapses() {
        let start = Instant::now();
        let mut timer = Timer::new(Duration::from_secs(10));
        timer.restart(start);

        assert!(timer.is_running(start + Duration::from_secs(9)));
        assert_eq!(timer.remaining(start + Duration::from_secs(4)), Some(Duration::from_secs(6)));
        assert!(!timer.is_running(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_restart_extends_countdown() {
        let start = Instant::now();
        let mut timer = Timer::new(Duration::from_secs(10));
        timer.restart(start);
        timer.restart(start + Duration::from_secs(8));

        assert!(timer.is_running(start + Duration::from_secs(15)));
    }

    #[test]
    fn test_abort_stops_countdown() {
        let start = Instant::now();
        let mut timer = Timer::new(Duration::from_secs(10));
        timer.restart(start);
        timer.abort();

        assert!(!timer.is_running(start));
    }
}
