//! A counting semaphore built on `Mutex` + `Condvar`.
//!
//! The standard library does not expose a semaphore type, so channels build
//! their own out of the two primitives it does expose. This is the single
//! blocking primitive used for all three axes described in the crate
//! documentation: the slot-availability axis, the item-availability axis, and
//! the per-[`select`](crate::select) wake token.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// A counting semaphore with `acquire`/`release`/`try_acquire` operations.
///
/// Acquiring blocks the calling thread while the count is zero; releasing
/// increments the count and wakes at most one waiter. A single `release` is
/// all the chain-wake-up protocol needs: each waiter it wakes re-posts once
/// more on its way out if it finds the channel closed, so an unbounded
/// number of waiters eventually all observe the same close.
#[derive(Debug)]
pub(crate) struct Semaphore {
    count: Mutex<usize>,
    condvar: Condvar,
}

impl Semaphore {
    /// Creates a new semaphore with the given initial count.
    pub(crate) fn new(initial: usize) -> Self {
        Semaphore {
            count: Mutex::new(initial),
            condvar: Condvar::new(),
        }
    }

    /// Blocks until the count is non-zero, then decrements it by one.
    pub(crate) fn acquire(&self) {
        let mut count = self.count.lock().unwrap();
        while *count == 0 {
            count = self.condvar.wait(count).unwrap();
        }
        *count -= 1;
    }

    /// Blocks until the count is non-zero or `timeout` elapses.
    ///
    /// Returns `true` if a permit was acquired, `false` on timeout.
    pub(crate) fn acquire_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.count.lock().unwrap();
        loop {
            if *count > 0 {
                *count -= 1;
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, result) = self
                .condvar
                .wait_timeout(count, deadline - now)
                .unwrap();
            count = guard;
            if result.timed_out() && *count == 0 {
                return false;
            }
        }
    }

    /// Decrements the count by one without blocking if it is already
    /// non-zero; returns whether a permit was acquired.
    pub(crate) fn try_acquire(&self) -> bool {
        let mut count = self.count.lock().unwrap();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    /// Increments the count by one and wakes a single waiter.
    ///
    /// A single `release` is always enough to start the chain-wake-up
    /// cascade documented at the crate level: the one waiter it wakes
    /// re-checks the `closed` flag and, if set, calls `release` again
    /// before returning its closed error, waking the next waiter in turn,
    /// and so on until every blocked thread on this axis has observed the
    /// close.
    pub(crate) fn release(&self) {
        let mut count = self.count.lock().unwrap();
        *count += 1;
        self.condvar.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn acquire_blocks_until_release() {
        let sem = Arc::new(Semaphore::new(0));
        let sem2 = sem.clone();

        let handle = thread::spawn(move || {
            sem2.acquire();
        });

        thread::sleep(Duration::from_millis(50));
        sem.release();
        handle.join().unwrap();
    }

    #[test]
    fn try_acquire_does_not_block() {
        let sem = Semaphore::new(0);
        assert!(!sem.try_acquire());
        sem.release();
        assert!(sem.try_acquire());
        assert!(!sem.try_acquire());
    }

    #[test]
    fn acquire_timeout_expires() {
        let sem = Semaphore::new(0);
        assert!(!sem.acquire_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn acquire_timeout_succeeds() {
        let sem = Arc::new(Semaphore::new(0));
        let sem2 = sem.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            sem2.release();
        });
        assert!(sem.acquire_timeout(Duration::from_secs(1)));
    }
}
