use std::collections::VecDeque;

/// A first-in, first-out queue of events.
///
/// Producers (window and touch callbacks) only ever push; the consumer takes every queued
/// event at once at the start of a tick. Events pushed while the consumer is processing a
/// drained batch land in the next batch.
///
/// # Type Parameters
/// - `T`: The event type
#[derive(Debug, Clone)]
pub struct EventQueue<T> {
    events: VecDeque<T>,
}

impl<T> EventQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Appends an event.
    pub fn push(&mut self, event: T) {
        self.events.push_back(event);
    }

    /// Appends every event of an iterator, in order.
    pub fn extend(&mut self, events: impl IntoIterator<Item = T>) {
        self.events.extend(events);
    }

    /// Removes and yields every queued event in arrival order.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, T> {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every queued event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.extend([1, 2]);
        queue.push(3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn events_pushed_after_a_drain_wait_for_the_next_one() {
        let mut queue = EventQueue::new();
        queue.push('a');
        let first: Vec<char> = queue.drain().collect();
        queue.push('b');
        assert_eq!(first, vec!['a']);
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec!['b']);
    }
}
