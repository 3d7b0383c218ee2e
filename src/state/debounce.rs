//! Trailing-edge debounce modelled as an explicit arm/cancel/fire timer.
//!
//! The timer never reads a clock itself: callers pass the current [`Instant`]
//! when arming and polling, which keeps the timeline deterministic in tests
//! and lets the host event loop decide how to wake up.

use std::time::{Duration, Instant};

/// Quiet period applied to free-text search input.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct Armed<T> {
    value: T,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    armed: Option<Armed<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self { wait, armed: None }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Arms the timer with `value`, superseding any pending value.
    /// Returns the superseded value, if any.
    pub fn call(&mut self, value: T, now: Instant) -> Option<T> {
        let deadline = now + self.wait;
        self.armed
            .replace(Armed { value, deadline })
            .map(|previous| previous.value)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Instant at which the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|armed| armed.deadline)
    }

    /// Fires the pending value once its deadline has been reached.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.armed {
            Some(armed) if now >= armed.deadline => self.armed.take().map(|armed| armed.value),
            _ => None,
        }
    }

    /// Disarms the timer. The pending value is returned and never fires.
    pub fn cancel(&mut self) -> Option<T> {
        self.armed.take().map(|armed| armed.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_quiet_period() {
        let start = Instant::now();
        let at = |ms: u64| start + Duration::from_millis(ms);
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);

        assert_eq!(debouncer.call("a", at(0)), None);
        assert_eq!(debouncer.call("ab", at(100)), Some("a"));
        assert_eq!(debouncer.call("abc", at(200)), Some("ab"));

        assert_eq!(debouncer.poll(at(500)), None);
        assert_eq!(debouncer.poll(at(699)), None);
        assert_eq!(debouncer.deadline(), Some(at(700)));
        assert_eq!(debouncer.poll(at(700)), Some("abc"));
        assert_eq!(debouncer.poll(at(900)), None);
        assert!(!debouncer.is_armed());
    }

    #[test]
    fn cancel_prevents_firing() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
        debouncer.call("late", start);

        assert_eq!(debouncer.cancel(), Some("late"));
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }
}
