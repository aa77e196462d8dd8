//! Identity tracking for host timers.
//!
//! Zellij's `set_timeout` returns nothing and its `Timer` event only carries
//! the elapsed duration. Every timer the plugin schedules uses the same
//! debounce interval, so the host fires them in issue order and the oldest
//! outstanding id is the one that elapsed.

use std::collections::VecDeque;

use crate::posts::TimerId;

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    last_issued: TimerId,
    outstanding: VecDeque<TimerId>,
}

impl TimerQueue {
    /// Allocates a fresh id and records it as outstanding.
    pub fn issue(&mut self) -> TimerId {
        self.last_issued = self.last_issued.next();
        self.outstanding.push_back(self.last_issued);
        self.last_issued
    }

    /// Resolves a host `Timer` event to the id that elapsed.
    ///
    /// Returns `None` for a timer the queue never issued.
    pub fn resolve_elapsed(&mut self) -> Option<TimerId> {
        let id = self.outstanding.pop_front();
        if id.is_none() {
            tracing::debug!("Timer event without outstanding timer");
        }
        id
    }

    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_issue_order() {
        let mut queue = TimerQueue::default();
        let first = queue.issue();
        let second = queue.issue();
        assert_ne!(first, second);
        assert_eq!(queue.outstanding(), 2);

        assert_eq!(queue.resolve_elapsed(), Some(first));
        assert_eq!(queue.resolve_elapsed(), Some(second));
        assert_eq!(queue.resolve_elapsed(), None);
    }
}
