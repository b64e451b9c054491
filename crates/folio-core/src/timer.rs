#![forbid(unsafe_code)]

//! Keyed one-shot timers on a host-supplied clock.
//!
//! Each key holds at most one deadline; scheduling a key again replaces its
//! deadline. [`TimerQueue::drain_due`] returns the keys whose deadline has
//! passed, earliest first, and forgets them.

use core::time::Duration;

/// One-shot timers keyed by `K`.
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<(Duration, K)>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq> TimerQueue<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire at `deadline`, replacing an earlier schedule.
    pub fn schedule(&mut self, key: K, deadline: Duration) {
        self.cancel(&key);
        self.entries.push((deadline, key));
    }

    /// Remove `key`. Returns whether it was pending.
    pub fn cancel(&mut self, key: &K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(_, k)| k != key);
        self.entries.len() != before
    }

    #[must_use]
    pub fn is_scheduled(&self, key: &K) -> bool {
        self.entries.iter().any(|(_, k)| k == key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().map(|(d, _)| *d).min()
    }

    /// Remove and return every key due at `now`, ordered by deadline.
    ///
    /// Keys sharing a deadline keep their scheduling order.
    pub fn drain_due(&mut self, now: Duration) -> Vec<K> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|(d, _)| *d <= now);
        self.entries = pending;
        due.sort_by_key(|(d, _)| *d);
        due.into_iter().map(|(_, k)| k).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn drains_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule("b", ms(20));
        q.schedule("a", ms(10));
        q.schedule("c", ms(30));
        assert_eq!(q.next_deadline(), Some(ms(10)));
        assert_eq!(q.drain_due(ms(25)), vec!["a", "b"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain_due(ms(29)), Vec::<&str>::new());
        assert_eq!(q.drain_due(ms(30)), vec!["c"]);
        assert!(q.is_empty());
    }

    #[test]
    fn rescheduling_replaces_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(1u32, ms(10));
        q.schedule(1u32, ms(50));
        assert_eq!(q.len(), 1);
        assert!(q.drain_due(ms(10)).is_empty());
        assert_eq!(q.drain_due(ms(50)), vec![1]);
    }

    #[test]
    fn cancel_removes_pending_key() {
        let mut q = TimerQueue::new();
        q.schedule('x', ms(5));
        assert!(q.is_scheduled(&'x'));
        assert!(q.cancel(&'x'));
        assert!(!q.cancel(&'x'));
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn ties_keep_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule("first", ms(5));
        q.schedule("second", ms(5));
        assert_eq!(q.drain_due(ms(5)), vec!["first", "second"]);
    }
}
