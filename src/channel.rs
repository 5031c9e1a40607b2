//! The channel object: single-channel send/receive, close, and destroy.
//!
//! This is where the buffer (§A), the subscriber registry (§B), and the two
//! blocking axes (§5) are brought together. A [`Channel`] is a single,
//! `Clone`-able handle that is both sender and receiver — unlike the teacher
//! crate's split `Sender`/`Receiver` pair, every handle can send *and*
//! receive, because the specification models one channel object shared by
//! multiple producers and multiple consumers rather than two distinct roles.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::buffer::RingBuffer;
use crate::error::{
    CloseError, DestroyError, RecvError, RecvTimeoutError, SendError, SendTimeoutError,
    TryRecvError, TrySendError,
};
use crate::registry::{RegistrationId, SubscriberRegistry};
use crate::semaphore::Semaphore;

/// Shared, lock-guarded mutable state of a channel.
struct State<T> {
    buffer: RingBuffer<T>,
    closed: bool,
    subscribers: SubscriberRegistry,
}

/// Data shared by every handle to the same channel.
struct Inner<T> {
    state: Mutex<State<T>>,
    /// Blocking axis for senders: conceptually "number of free slots".
    ///
    /// Always kept in lockstep with the real number of free slots in the
    /// buffer, except that `close` posts one extra, non-refundable permit on
    /// this axis to guarantee that every blocked sender wakes up at least
    /// once to observe the closed flag (see [`Channel::close`]).
    slots: Semaphore,
    /// Blocking axis for receivers: conceptually "number of buffered items".
    ///
    /// Kept in lockstep with the real number of buffered items, with the
    /// same one-shot surplus permit posted by `close`.
    items: Semaphore,
}

/// A bounded, thread-safe, typed channel.
///
/// `Channel<T>` is the single handle type used by both producers and
/// consumers: any clone can call [`send`](Channel::send) or
/// [`receive`](Channel::receive) concurrently with any other. Cloning
/// increments a reference count; it does not create an independent channel.
///
/// See the crate documentation for the full concurrency model.
pub struct Channel<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Channel<T> {
    /// Creates a new channel with the given buffer capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. The specification permits implementations
    /// to reject a zero capacity at construction time rather than implement
    /// true unbuffered rendezvous, and this crate does so, matching the
    /// teacher crate's own precedent of panicking on an invalid capacity
    /// argument.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 1, "channel capacity must be at least 1");

        let inner = Inner {
            state: Mutex::new(State {
                buffer: RingBuffer::new(capacity),
                closed: false,
                subscribers: SubscriberRegistry::new(),
            }),
            slots: Semaphore::new(capacity),
            items: Semaphore::new(0),
        };

        Channel {
            inner: Arc::new(inner),
        }
    }

    /// The fixed buffer capacity of this channel.
    pub fn capacity(&self) -> usize {
        self.inner.state.lock().unwrap().buffer.capacity()
    }

    /// Sends a value, blocking until a slot is available or the channel is
    /// closed.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        self.inner.slots.acquire();

        let mut state = self.inner.state.lock().unwrap();
        if state.closed {
            drop(state);
            // Chain wake-up: propagate the close to the next blocked sender.
            self.inner.slots.release();
            return Err(SendError(value));
        }

        state.buffer.push(value);
        self.inner.items.release();
        state.subscribers.for_each(|token| token.release());
        Ok(())
    }

    /// Sends a value, blocking until a slot is available, the channel is
    /// closed, or `timeout` elapses.
    pub fn send_timeout(&self, value: T, timeout: Duration) -> Result<(), SendTimeoutError<T>> {
        if !self.inner.slots.acquire_timeout(timeout) {
            return Err(SendTimeoutError::Timeout(value));
        }

        let mut state = self.inner.state.lock().unwrap();
        if state.closed {
            drop(state);
            self.inner.slots.release();
            return Err(SendTimeoutError::Closed(value));
        }

        state.buffer.push(value);
        self.inner.items.release();
        state.subscribers.for_each(|token| token.release());
        Ok(())
    }

    /// Attempts to send a value without blocking.
    ///
    /// Returns `Err(TrySendError::Closed(_))` even when the buffer also
    /// happens to be full, since a closed channel takes priority over
    /// fullness.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        self.try_send_inner(value)
    }

    pub(crate) fn try_send_inner(&self, value: T) -> Result<(), TrySendError<T>> {
        // Reserve the slot permit first, exactly as the blocking `send` does
        // (just via `try_acquire` instead of `acquire`), so a concurrent
        // blocking `send` and a `try_send`/`select` on the same channel never
        // both believe they are entitled to push: the semaphore, not a
        // snapshot of `buffer.is_full()`, is the single source of truth for
        // slot availability.
        if !self.inner.slots.try_acquire() {
            // No free slot right now. A closed channel's sentinel permit may
            // be momentarily held by a racing operation that hasn't
            // re-posted it yet, so check the flag directly rather than
            // concluding `Full` from the failed `try_acquire` alone.
            let state = self.inner.state.lock().unwrap();
            return Err(if state.closed {
                TrySendError::Closed(value)
            } else {
                TrySendError::Full(value)
            });
        }

        let mut state = self.inner.state.lock().unwrap();
        if state.closed {
            drop(state);
            // Chain wake-up: the permit we just took was the closed
            // sentinel, not a real slot; repost it for the next waiter.
            self.inner.slots.release();
            return Err(TrySendError::Closed(value));
        }

        state.buffer.push(value);
        self.inner.items.release();
        state.subscribers.for_each(|token| token.release());
        Ok(())
    }

    /// Receives a value, blocking until one is available or the channel is
    /// closed and drained.
    ///
    /// If the channel is closed while values remain buffered, those values
    /// are still returned in FIFO order; only once the buffer is empty does
    /// `receive` return `Err`.
    pub fn receive(&self) -> Result<T, RecvError> {
        self.inner.items.acquire();

        let mut state = self.inner.state.lock().unwrap();
        if state.buffer.is_empty() {
            drop(state);
            // Chain wake-up: propagate the close to the next blocked receiver.
            self.inner.items.release();
            return Err(RecvError);
        }

        let value = state.buffer.pop();
        self.inner.slots.release();
        state.subscribers.for_each(|token| token.release());
        Ok(value)
    }

    /// Receives a value, blocking until one is available, the channel is
    /// closed and drained, or `timeout` elapses.
    pub fn receive_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        if !self.inner.items.acquire_timeout(timeout) {
            return Err(RecvTimeoutError::Timeout);
        }

        let mut state = self.inner.state.lock().unwrap();
        if state.buffer.is_empty() {
            drop(state);
            self.inner.items.release();
            return Err(RecvTimeoutError::Closed);
        }

        let value = state.buffer.pop();
        self.inner.slots.release();
        state.subscribers.for_each(|token| token.release());
        Ok(value)
    }

    /// Attempts to receive a value without blocking.
    ///
    /// Drains buffered values before ever reporting the channel as closed:
    /// `Err(TryRecvError::Closed)` is only returned once the buffer is
    /// empty.
    pub fn try_receive(&self) -> Result<T, TryRecvError> {
        self.try_receive_inner()
    }

    pub(crate) fn try_receive_inner(&self) -> Result<T, TryRecvError> {
        // Mirror image of `try_send_inner`: reserve the item permit first,
        // just as blocking `receive` does via `acquire`, so a concurrent
        // blocking `receive` and a `try_receive`/`select` on the same
        // channel can never both believe the same buffered element is
        // theirs to pop.
        if !self.inner.items.try_acquire() {
            let state = self.inner.state.lock().unwrap();
            return Err(if state.closed {
                TryRecvError::Closed
            } else {
                TryRecvError::Empty
            });
        }

        let mut state = self.inner.state.lock().unwrap();
        if state.buffer.is_empty() {
            drop(state);
            // Chain wake-up: the permit taken was the closed sentinel, not a
            // real item; repost it for the next waiter.
            self.inner.items.release();
            return Err(TryRecvError::Closed);
        }

        let value = state.buffer.pop();
        self.inner.slots.release();
        state.subscribers.for_each(|token| token.release());
        Ok(value)
    }

    /// Closes the channel.
    ///
    /// Wakes every currently blocked `send`, `receive`, and `select` call
    /// involving this channel so that each returns a closed error in finite
    /// time (see the crate-level chain-wake-up documentation). Returns
    /// `Err(CloseError)` if the channel was already closed; closing is a
    /// single-shot transition.
    pub fn close(&self) -> Result<(), CloseError> {
        let mut state = self.inner.state.lock().unwrap();
        if state.closed {
            return Err(CloseError);
        }

        state.closed = true;
        self.inner.slots.release();
        self.inner.items.release();
        state.subscribers.for_each(|token| token.release());
        Ok(())
    }

    /// Validates the destroy precondition from the specification.
    ///
    /// Returns `Err(DestroyError)` if the channel has not been closed yet.
    /// This does not free any resources: Rust's ownership model already
    /// deallocates the buffer, registry, and synchronization primitives once
    /// every `Channel` handle has been dropped. `destroy` exists purely so
    /// that code ported against the specification's explicit lifecycle can
    /// still observe the same precondition violation.
    pub fn destroy(&self) -> Result<(), DestroyError> {
        let state = self.inner.state.lock().unwrap();
        if state.closed {
            Ok(())
        } else {
            Err(DestroyError)
        }
    }

    /// Registers a wake token in this channel's subscriber registry.
    ///
    /// Used exclusively by [`select`](crate::select::select).
    pub(crate) fn subscribe(&self, token: Arc<Semaphore>) -> RegistrationId {
        let mut state = self.inner.state.lock().unwrap();
        state.subscribers.insert(token)
    }

    /// Removes a previously registered wake token.
    pub(crate) fn unsubscribe(&self, id: RegistrationId) {
        let mut state = self.inner.state.lock().unwrap();
        state.subscribers.remove(id);
    }

    /// Whether `other` refers to the same underlying channel as `self`.
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Channel {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel").finish_non_exhaustive()
    }
}

/// Creates a new bounded channel, returning a single `Clone`-able handle
/// usable by any number of producers and consumers.
///
/// # Panics
///
/// Panics if `capacity` is 0.
pub fn channel<T>(capacity: usize) -> Channel<T> {
    Channel::new(capacity)
}
