//! Explicit cancellable debounce timer for quick search.
//!
//! Each keystroke restarts the deadline; the pending input fires once the
//! quiet window elapses. Driven from the event-loop tick so tests can
//! inject time.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    pending: Option<(Instant, String)>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Arm (or re-arm) the timer with the latest input.
    pub fn start(&mut self, input: String, now: Instant) {
        self.pending = Some((now + self.window, input));
    }

    /// Drop any pending input without firing.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Return the pending input if its deadline has passed, disarming the
    /// timer. At most one firing per armed burst.
    pub fn fire_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => {
                self.pending.take().map(|(_, input)| input)
            }
            _ => None,
        }
    }
}
