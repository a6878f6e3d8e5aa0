//! Fire-once delayed tasks on a virtual clock
//!
//! The clock only moves when the host advances it, which keeps timer
//! behavior deterministic under test. The binary maps it onto tokio sleeps.

use std::collections::{BTreeMap, HashMap};

/// Handle returned by [`Scheduler::schedule`], used to cancel the task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_seq: u64,
    /// Keyed by (due time, sequence) so equal deadlines run in schedule order
    pending: BTreeMap<(u64, u64), T>,
    due_by_seq: HashMap<u64, u64>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            pending: BTreeMap::new(),
            due_by_seq: HashMap::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.pending.insert((due, seq), task);
        self.due_by_seq.insert(seq, due);
        TaskHandle(seq)
    }

    /// Cancel a pending task. Returns false when it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.due_by_seq.remove(&handle.0) {
            Some(due) => self.pending.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.due_by_seq.contains_key(&handle.0)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Deadline of the earliest pending task
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Pop the earliest task due at or before `until`, moving the clock to its deadline
    pub fn pop_due(&mut self, until: u64) -> Option<T> {
        let (&(due, seq), _) = self.pending.iter().next()?;
        if due > until {
            return None;
        }
        self.due_by_seq.remove(&seq);
        self.now_ms = self.now_ms.max(due);
        self.pending.remove(&(due, seq))
    }

    /// Move the clock forward to `until` without running anything
    pub fn set_now(&mut self, until: u64) {
        self.now_ms = self.now_ms.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_in_deadline_then_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1000, "b");
        scheduler.schedule(500, "a");
        scheduler.schedule(1000, "c");

        assert_eq!(scheduler.next_deadline(), Some(500));
        assert_eq!(scheduler.pop_due(999), Some("a"));
        assert_eq!(scheduler.now(), 500);
        assert_eq!(scheduler.pop_due(999), None);
        assert_eq!(scheduler.pop_due(1000), Some("b"));
        assert_eq!(scheduler.pop_due(1000), Some("c"));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule(1000, 1);
        let other = scheduler.schedule(1000, 2);
        assert!(scheduler.is_pending(handle));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(!scheduler.is_pending(handle));
        assert_eq!(scheduler.pop_due(5000), Some(2));
        assert!(!scheduler.cancel(other));
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.set_now(2000);
        scheduler.schedule(1000, ());
        assert_eq!(scheduler.next_deadline(), Some(3000));
        assert_eq!(scheduler.pop_due(2999), None);
        assert_eq!(scheduler.pop_due(3000), Some(()));
        assert_eq!(scheduler.next_deadline(), None);
    }
}
