//! Single-deadline timer slot.
//!
//! The scheduler never sleeps. It records when it wants to fire next and
//! whoever drives it (a runner thread, an audio callback, a test) calls
//! `poll` once that time has passed.

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerSlot {
    deadline: Option<Duration>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[inline]
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    #[inline]
    pub fn schedule_at(&mut self, deadline: Duration) {
        self.deadline = Some(deadline);
    }

    #[inline]
    pub fn schedule_after(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now.saturating_add(delay));
    }

    #[inline]
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
