//! # Bounded task backlog.
//!
//! FIFO for new submissions: enqueue at the tail, dequeue from the head.
//! Retried tasks re-enter at the **head**, ahead of tasks that arrived after
//! their failure — in-flight work is recovered before newcomers are served.
//!
//! Capacity binds at submission time only: [`BoundedQueue::admit`] refuses a
//! new task when the backlog is full, while [`BoundedQueue::requeue`] always
//! succeeds because a retried task already holds admission.

use std::collections::VecDeque;

use super::job::Job;

/// Ordered, capacity-limited holding area for pending tasks.
pub(crate) struct BoundedQueue<T> {
    items: VecDeque<Job<T>>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    /// True when a new submission would be refused.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Admits a new task at the tail; gives it back when at capacity.
    pub fn admit(&mut self, job: Job<T>) -> Result<(), Job<T>> {
        if self.is_full() {
            return Err(job);
        }
        self.items.push_back(job);
        Ok(())
    }

    /// Re-inserts a retried task at the head.
    pub fn requeue(&mut self, job: Job<T>) {
        self.items.push_front(job);
    }

    /// Removes and returns the head task.
    pub fn pop(&mut self) -> Option<Job<T>> {
        self.items.pop_front()
    }

    /// Drains every pending task (used by reset/teardown to settle them).
    pub fn drain(&mut self) -> impl Iterator<Item = Job<T>> + '_ {
        self.items.drain(..)
    }
}
