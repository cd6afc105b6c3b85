//! Deferred continuations driven by the UI loop.
//!
//! Nothing here owns a clock or a thread: callers pass `now` in, and fire
//! whatever `take_due` hands back.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    due: Instant,
    task: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_handle: u64,
    pending: Vec<ScheduledTask<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(ScheduledTask {
            handle,
            due: now + delay,
            task,
        });
        handle
    }

    /// Drops a pending task. Returns false if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|scheduled| scheduled.handle != handle);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        self.pending.clear();
        cancelled
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending
            .iter()
            .any(|scheduled| scheduled.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|scheduled| scheduled.due).min()
    }

    /// Removes and returns every task due at or before `now`, earliest first.
    /// Tasks due at the same instant keep scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let (mut due, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|scheduled| scheduled.due <= now);
        self.pending = waiting;
        due.sort_by_key(|scheduled| (scheduled.due, scheduled.handle));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }
}
