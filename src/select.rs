//! The multi-way `select` engine.
//!
//! Blocks a single calling thread across any number of send/receive
//! candidates on possibly-distinct channels, waking as soon as any one of
//! them can make progress. This mirrors the source's `channel_select`, but
//! drops its redundant single-pointer `sem_select` field: every channel here
//! is notified purely through the list-based subscriber registry that
//! `channel_select` already maintains alongside it, so there is only one
//! representation of "who is waiting" rather than two that can fall out of
//! sync.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::channel::Channel;
use crate::error::{SelectError, SelectTimeoutError};
use crate::registry::RegistrationId;
use crate::semaphore::Semaphore;

/// One operation offered to [`select`]: either a value to send on a channel,
/// or a receive attempt on a channel.
pub enum Candidate<'a, T> {
    /// Attempt to send `value` on `channel`.
    Send {
        /// The channel to send on.
        channel: &'a Channel<T>,
        /// The value to send if this candidate is chosen.
        value: T,
    },
    /// Attempt to receive a value from `channel`.
    Receive {
        /// The channel to receive from.
        channel: &'a Channel<T>,
    },
}

impl<'a, T> Candidate<'a, T> {
    /// Builds a send candidate.
    pub fn send(channel: &'a Channel<T>, value: T) -> Self {
        Candidate::Send { channel, value }
    }

    /// Builds a receive candidate.
    pub fn receive(channel: &'a Channel<T>) -> Self {
        Candidate::Receive { channel }
    }
}

/// The result of a successful [`select`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome<T> {
    /// The send candidate at `index` completed.
    Sent {
        /// The index, within the candidate slice, of the channel sent on.
        index: usize,
    },
    /// The receive candidate at `index` completed, yielding `value`.
    Received {
        /// The index, within the candidate slice, of the channel received
        /// from.
        index: usize,
        /// The value received.
        value: T,
    },
}

/// Registers `token` with every distinct channel among `candidates`,
/// deduplicating by channel identity so that two candidates referring to the
/// same physical channel only produce one subscriber-registry entry (the
/// specification's invariant that a single `select` call never double-
/// registers against one channel).
///
/// Returns one registration slot per candidate; candidates that share a
/// channel with an earlier candidate reuse that earlier registration and do
/// not re-register.
struct Registrations {
    ids: Vec<Option<RegistrationId>>,
}

impl Registrations {
    fn register<T>(items: &[WorkItem<'_, T>], token: &Arc<Semaphore>) -> Self {
        let mut ids = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let already_registered = items[..i]
                .iter()
                .any(|earlier| earlier.channel().ptr_eq(item.channel()));
            if already_registered {
                ids.push(None);
            } else {
                ids.push(Some(item.channel().subscribe(token.clone())));
            }
        }
        Registrations { ids }
    }

    fn unregister<T>(&self, items: &[WorkItem<'_, T>]) {
        for (item, id) in items.iter().zip(&self.ids) {
            if let Some(id) = id {
                item.channel().unsubscribe(*id);
            }
        }
    }
}

/// An in-progress candidate: like [`Candidate`], but a send value that has
/// been handed to the channel and not returned (because it was consumed by
/// a successful send) leaves this slot terminally empty. Kept separate from
/// the public `Candidate` enum so callers never see the `Option`.
enum WorkItem<'a, T> {
    Send {
        channel: &'a Channel<T>,
        value: Option<T>,
    },
    Receive {
        channel: &'a Channel<T>,
    },
}

impl<'a, T> WorkItem<'a, T> {
    fn channel(&self) -> &'a Channel<T> {
        match self {
            WorkItem::Send { channel, .. } => channel,
            WorkItem::Receive { channel } => channel,
        }
    }
}

impl<'a, T> From<Candidate<'a, T>> for WorkItem<'a, T> {
    fn from(candidate: Candidate<'a, T>) -> Self {
        match candidate {
            Candidate::Send { channel, value } => WorkItem::Send {
                channel,
                value: Some(value),
            },
            Candidate::Receive { channel } => WorkItem::Receive { channel },
        }
    }
}

/// Attempts every candidate once, in order, without blocking.
///
/// Returns `Some` as soon as one candidate succeeds or fails with a closed
/// error; returns `None` if every candidate was merely unready (full for a
/// send, empty for a receive).
fn try_once<T>(items: &mut [WorkItem<'_, T>]) -> Option<Result<Outcome<T>, SelectError>> {
    for index in 0..items.len() {
        let outcome = match &mut items[index] {
            WorkItem::Send { channel, value } => {
                let to_send = value.take().expect("send candidate already resolved");
                match channel.try_send_inner(to_send) {
                    Ok(()) => Some(Ok(Outcome::Sent { index })),
                    Err(crate::error::TrySendError::Full(returned)) => {
                        *value = Some(returned);
                        None
                    }
                    Err(crate::error::TrySendError::Closed(returned)) => {
                        *value = Some(returned);
                        Some(Err(SelectError { index }))
                    }
                }
            }
            WorkItem::Receive { channel } => match channel.try_receive_inner() {
                Ok(value) => Some(Ok(Outcome::Received { index, value })),
                Err(crate::error::TryRecvError::Empty) => None,
                Err(crate::error::TryRecvError::Closed) => Some(Err(SelectError { index })),
            },
        };
        if let Some(outcome) = outcome {
            return Some(outcome);
        }
    }
    None
}

/// Blocks until one of `candidates` can make progress, then performs it.
///
/// Each candidate is either [`Candidate::send`] or [`Candidate::receive`].
/// Scanning restarts from index 0 on every iteration of the wait loop, so no
/// candidate is permanently starved by one earlier in the slice that never
/// becomes ready.
///
/// # Panics
///
/// Panics if `candidates` is empty.
pub fn select<T>(candidates: Vec<Candidate<'_, T>>) -> Result<Outcome<T>, SelectError> {
    assert!(!candidates.is_empty(), "select requires at least one candidate");
    let mut items: Vec<WorkItem<'_, T>> = candidates.into_iter().map(WorkItem::from).collect();

    if let Some(outcome) = try_once(&mut items) {
        return outcome;
    }

    let token = Arc::new(Semaphore::new(0));
    let registrations = Registrations::register(&items, &token);

    // Re-scan once more right after registering, before ever parking: a
    // candidate may have become ready in the window between the unregistered
    // scan above and this registration completing, and nobody would have
    // posted to `token` for a transition that happened before it existed.
    let result = loop {
        if let Some(outcome) = try_once(&mut items) {
            break outcome;
        }
        token.acquire();
        // Spurious wake (another candidate's concurrent winner raced us, or
        // the permit belonged to an event already consumed by a rescan): go
        // back and rescan.
    };

    registrations.unregister(&items);
    result
}

/// Like [`select`], but gives up and returns `Err(SelectTimeoutError::Timeout)`
/// if no candidate becomes ready before `timeout` elapses.
///
/// # Panics
///
/// Panics if `candidates` is empty.
pub fn select_timeout<T>(
    candidates: Vec<Candidate<'_, T>>,
    timeout: Duration,
) -> Result<Outcome<T>, SelectTimeoutError> {
    assert!(!candidates.is_empty(), "select requires at least one candidate");
    let mut items: Vec<WorkItem<'_, T>> = candidates.into_iter().map(WorkItem::from).collect();

    if let Some(outcome) = try_once(&mut items) {
        return outcome.map_err(|SelectError { index }| SelectTimeoutError::Closed { index });
    }

    let deadline = Instant::now() + timeout;
    let token = Arc::new(Semaphore::new(0));
    let registrations = Registrations::register(&items, &token);

    // As in `select`, rescan immediately after registering — before the
    // first park — to catch a transition that raced the registration.
    let result = loop {
        if let Some(outcome) = try_once(&mut items) {
            break outcome.map_err(|SelectError { index }| SelectTimeoutError::Closed { index });
        }
        let now = Instant::now();
        if now >= deadline {
            break Err(SelectTimeoutError::Timeout);
        }
        if !token.acquire_timeout(deadline - now) {
            // Final check: the timeout may have raced a just-posted token.
            if let Some(outcome) = try_once(&mut items) {
                break outcome.map_err(|SelectError { index }| SelectTimeoutError::Closed { index });
            }
            break Err(SelectTimeoutError::Timeout);
        }
    };

    registrations.unregister(&items);
    result
}
