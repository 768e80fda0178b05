//! User presence tracking.
//!
//! Tracks whether the user is currently active (interacted within the
//! active window) or passive (interacted within the longer passive window).
//! Activity only counts while the view is focused; losing focus stops both
//! countdowns immediately.
//!
//! The current `ActivityState` is published through an observable so that
//! consumers can react to transitions. Transitions caused by time passing
//! are picked up by calling `refresh`.

mod timer;

use std::time::{Duration, Instant};

use eyeball::{Observable, Subscriber};
use serde::Serialize;
pub use timer::Timer;

use crate::config::PresenceConfig;

/// Presence of the local user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityState {
    /// No recent activity, or the view is not focused.
    #[default]
    Idle,
    /// Interacted within the active window.
    Active,
    /// Interacted within the passive window, but not the active one.
    Passive,
}

/// Activity tracker for the local user.
pub struct UserActivity {
    active: Timer,
    passive: Timer,
    focused: bool,
    state: Observable<ActivityState>,
}

impl UserActivity {
    /// Create a tracker with explicit windows.
    #[must_use]
    pub fn new(active_window: Duration, passive_window: Duration) -> Self {
        Self {
            active: Timer::new(active_window),
            passive: Timer::new(passive_window),
            focused: true,
            state: Observable::new(ActivityState::Idle),
        }
    }

    /// Create a tracker from the presence configuration.
    #[must_use]
    pub fn from_config(config: &PresenceConfig) -> Self {
        Self::new(config.active_window(), config.passive_window())
    }

    /// Record a user interaction at `now`.
    ///
    /// Ignored while the view is not focused.
    pub fn on_activity(&mut self, now: Instant) {
        if !self.focused {
            return;
        }
        self.active.restart(now);
        self.passive.restart(now);
        self.refresh(now);
    }

    /// Record a focus change at `now`.
    pub fn set_focused(&mut self, focused: bool, now: Instant) {
        self.focused = focused;
        if !focused {
            self.active.abort();
            self.passive.abort();
        }
        self.refresh(now);
    }

    /// Check if the user interacted within the active window.
    #[must_use]
    pub fn user_currently_active(&self, now: Instant) -> bool {
        self.focused && self.active.is_running(now)
    }

    /// Check if the user interacted within the passive window.
    ///
    /// An active user is also passive.
    #[must_use]
    pub fn user_currently_passive(&self, now: Instant) -> bool {
        self.focused && self.passive.is_running(now)
    }

    /// Presence at `now`.
    #[must_use]
    pub fn state_at(&self, now: Instant) -> ActivityState {
        if self.user_currently_active(now) {
            ActivityState::Active
        } else if self.user_currently_passive(now) {
            ActivityState::Passive
        } else {
            ActivityState::Idle
        }
    }

    /// Publish the presence at `now` if it changed.
    pub fn refresh(&mut self, now: Instant) -> ActivityState {
        let state = self.state_at(now);
        if *Observable::get(&self.state) != state {
            tracing::trace!(?state, "presence changed");
            Observable::set(&mut self.state, state);
        }
        state
    }

    /// Last published presence.
    #[must_use]
    pub fn state(&self) -> ActivityState { *Observable::get(&self.state) }

    /// Subscribe to published presence changes.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<ActivityState> { Observable::subscribe(&self.state) }
}

impl Default for UserActivity {
    fn default() -> Self { Self::from_config(&PresenceConfig::default()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_default_windows() {
        let start = Instant::now();
        let mut activity = UserActivity::default();
        activity.on_activity(start);

        assert!(activity.user_currently_active(start + 9 * SECOND));
        assert!(!activity.user_currently_active(start + 10 * SECOND));
        assert!(activity.user_currently_passive(start + 119 * SECOND));
        assert!(!activity.user_currently_passive(start + 120 * SECOND));
    }

    #[test]
    fn test_state_transitions() {
        let start = Instant::now();
        let mut activity = UserActivity::new(10 * SECOND, 60 * SECOND);
        assert_eq!(activity.state(), ActivityState::Idle);

        activity.on_activity(start);
        assert_eq!(activity.state(), ActivityState::Active);

        assert_eq!(activity.refresh(start + 30 * SECOND), ActivityState::Passive);
        assert_eq!(activity.refresh(start + 61 * SECOND), ActivityState::Idle);
    }

    #[test]
    fn test_losing_focus_aborts_timers() {
        let start = Instant::now();
        let mut activity = UserActivity::new(10 * SECOND, 60 * SECOND);
        activity.on_activity(start);

        activity.set_focused(false, start + 20 * SECOND);
        assert!(!activity.user_currently_passive(start + 20 * SECOND));
        assert_eq!(activity.state(), ActivityState::Idle);

        activity.set_focused(true, start + 21 * SECOND);
        assert!(!activity.user_currently_passive(start + 21 * SECOND));
    }

    #[test]
    fn test_activity_without_focus_is_ignored() {
        let start = Instant::now();
        let mut activity = UserActivity::new(10 * SECOND, 60 * SECOND);
        activity.set_focused(false, start);
        activity.on_activity(start);

        assert_eq!(activity.state_at(start), ActivityState::Idle);
    }

    #[test]
    fn test_subscriber_observes_transitions() {
        let start = Instant::now();
        let mut activity = UserActivity::new(10 * SECOND, 60 * SECOND);
        let mut subscriber = activity.subscribe();

        activity.on_activity(start);
        assert_eq!(futures::executor::block_on(subscriber.next()), Some(ActivityState::Active));
    }
}
