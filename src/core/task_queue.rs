//! Schedulable tasks on logical time
//!
//! A min-heap of `(fire_at, payload)` advanced from the main loop's own
//! clock. Tasks are not individually cancellable; `cancel_all` drops
//! every outstanding task at once.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::core::types::Millis;

/// Entry in the heap
#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    fire_at: OrderedFloat<Millis>,
    seq: u64, // insertion order, breaks ties
    payload: T,
}

impl<T> PartialEq for ScheduledTask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl<T> Eq for ScheduledTask<T> {}

impl<T> Ord for ScheduledTask<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for ScheduledTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Queue of tasks ordered by logical fire time
#[derive(Debug, Clone)]
pub struct TaskQueue<T> {
    heap: BinaryHeap<ScheduledTask<T>>,
    next_seq: u64,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fire at `fire_at`
    pub fn schedule(&mut self, fire_at: Millis, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ScheduledTask {
            fire_at: OrderedFloat(fire_at),
            seq,
            payload,
        });
    }

    /// Fire time of the earliest task, if any
    pub fn next_due_at(&self) -> Option<Millis> {
        self.heap.peek().map(|t| t.fire_at.into_inner())
    }

    /// Pop the earliest task if it is due at `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, T)> {
        match self.heap.peek() {
            Some(task) if task.fire_at.into_inner() <= now => self
                .heap
                .pop()
                .map(|t| (t.fire_at.into_inner(), t.payload)),
            _ => None,
        }
    }

    /// Pop every task due at `now`, in fire order
    pub fn drain_due(&mut self, now: Millis) -> Vec<(Millis, T)> {
        let mut due = Vec::new();
        while let Some(task) = self.pop_due(now) {
            due.push(task);
        }
        due
    }

    /// Remove every outstanding task, returning the payloads in fire order
    pub fn drain_all(&mut self) -> Vec<T> {
        let mut payloads = Vec::with_capacity(self.heap.len());
        while let Some(task) = self.heap.pop() {
            payloads.push(task.payload);
        }
        payloads
    }

    /// Drop every outstanding task. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.heap.len();
        self.heap.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_fire_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(300.0, "c");
        queue.schedule(100.0, "a");
        queue.schedule(200.0, "b");

        let due: Vec<_> = queue.drain_due(1000.0).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(50.0, 1);
        queue.schedule(50.0, 2);
        queue.schedule(50.0, 3);

        let due: Vec<_> = queue.drain_due(50.0).into_iter().map(|(_, p)| p).collect();
        assert_eq!(due, vec![1, 2, 3]);
    }

    #[test]
    fn test_not_due_stays_queued() {
        let mut queue = TaskQueue::new();
        queue.schedule(100.0, ());

        assert!(queue.pop_due(99.9).is_none());
        assert_eq!(queue.next_due_at(), Some(100.0));
        assert!(queue.pop_due(100.0).is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel_all_is_idempotent() {
        let mut queue = TaskQueue::new();
        queue.schedule(10.0, ());
        queue.schedule(20.0, ());

        assert_eq!(queue.cancel_all(), 2);
        assert_eq!(queue.cancel_all(), 0);
        assert!(queue.drain_due(1000.0).is_empty());
    }

    #[test]
    fn test_drain_all_returns_fire_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(300.0, 'c');
        queue.schedule(100.0, 'a');
        queue.schedule(200.0, 'b');

        assert_eq!(queue.drain_all(), vec!['a', 'b', 'c']);
        assert!(queue.is_empty());
    }
}
