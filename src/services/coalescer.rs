//! Last-wins debounce buffer owned by the offload worker.

use std::time::Duration;

use tokio::time::Instant;

/// Holds at most one pending item and the instant it becomes due.
///
/// Every push replaces the pending item and restarts the window (trailing
/// edge), so a burst produces exactly one item once it goes quiet.
#[derive(Debug)]
pub struct Coalescer<T> {
    window: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
    superseded: u64,
}

impl<T> Coalescer<T> {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            deadline: None,
            superseded: 0,
        }
    }

    /// Queue `item`, returning the item it replaced.
    pub fn push(&mut self, item: T, now: Instant) -> Option<T> {
        let replaced = self.pending.replace(item);
        if replaced.is_some() {
            self.superseded += 1;
        }
        self.deadline = Some(now + self.window);
        replaced
    }

    /// When the pending item becomes due, if there is one.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Take the pending item once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if deadline <= now => self.take(),
            _ => None,
        }
    }

    /// Take the pending item regardless of its deadline.
    pub fn take(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    pub const fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// Items dropped because a newer one arrived within the window.
    pub const fn superseded(&self) -> u64 {
        self.superseded
    }
}
