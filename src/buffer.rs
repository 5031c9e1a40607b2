//! A bounded FIFO element store.
//!
//! Unlike the teacher crate's [`Queue`](crate) — which is lock-free and must
//! therefore encode head/tail positions as atomics with wrap-around stamps —
//! this buffer is always accessed with the owning channel's lock held, so it
//! carries no synchronization of its own. It is a thin `VecDeque` wrapper
//! with a fixed capacity, matching the `buffer_create`/`buffer_add`/
//! `buffer_remove` collaborator described by the specification.

use std::collections::VecDeque;

/// A fixed-capacity FIFO buffer of opaque values.
///
/// # Panics
///
/// [`RingBuffer::push`] panics if the buffer is already at capacity and
/// [`RingBuffer::pop`] panics if the buffer is empty; both are precondition
/// violations that the channel is responsible for never triggering (it only
/// calls `push` after reserving a slot and `pop` after reserving an item).
pub(crate) struct RingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer with room for `capacity` elements.
    pub(crate) fn new(capacity: usize) -> Self {
        RingBuffer {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `value` to the tail of the buffer.
    pub(crate) fn push(&mut self, value: T) {
        debug_assert!(self.items.len() < self.capacity, "buffer is full");
        self.items.push_back(value);
    }

    /// Removes and returns the value at the head of the buffer.
    pub(crate) fn pop(&mut self) -> T {
        self.items
            .pop_front()
            .expect("pop called on an empty buffer")
    }

    /// The number of elements currently stored.
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// The fixed capacity of the buffer.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the buffer holds no elements.
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the buffer is at capacity.
    pub(crate) fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut buf = RingBuffer::new(3);
        buf.push(1);
        buf.push(2);
        buf.push(3);
        assert!(buf.is_full());
        assert_eq!(buf.pop(), 1);
        assert_eq!(buf.pop(), 2);
        buf.push(4);
        assert_eq!(buf.pop(), 3);
        assert_eq!(buf.pop(), 4);
        assert!(buf.is_empty());
    }

    #[test]
    fn len_and_capacity_track_usage() {
        let mut buf: RingBuffer<u8> = RingBuffer::new(2);
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.len(), 0);
        buf.push(1);
        assert_eq!(buf.len(), 1);
        buf.push(2);
        assert_eq!(buf.len(), 2);
        buf.pop();
        assert_eq!(buf.len(), 1);
    }

    #[test]
    #[should_panic(expected = "empty buffer")]
    fn pop_on_empty_panics() {
        let mut buf: RingBuffer<u8> = RingBuffer::new(1);
        buf.pop();
    }
}
