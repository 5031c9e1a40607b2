//! Error types returned by channel and select operations.
//!
//! Each operation has its own precisely-typed error, following the teacher
//! crate's convention (`SendError<T>`, `TrySendError<T>`, `RecvError`,
//! `TryRecvError`) rather than collapsing everything into one flat status
//! code as the source does. There is no `GEN_ERROR`/null-handle case here:
//! a `Channel<T>` is always valid once constructed.

use std::error;
use std::fmt;

/// An error returned when an attempt to send a message blockingly fails.
///
/// Always means the channel was closed; unlike [`TrySendError`] there is no
/// `Full` variant because `send` blocks instead of failing on a full
/// channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SendError<T>(pub T);

impl<T> error::Error for SendError<T> {}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "sending on a closed channel".fmt(f)
    }
}

/// An error returned when an attempt to send a message synchronously is
/// unsuccessful.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrySendError<T> {
    /// The channel is full.
    Full(T),
    /// The channel is closed.
    Closed(T),
}

impl<T: fmt::Debug> error::Error for TrySendError<T> {}

impl<T> fmt::Display for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySendError::Full(_) => "sending into a full channel".fmt(f),
            TrySendError::Closed(_) => "sending on a closed channel".fmt(f),
        }
    }
}

/// An error returned when an attempt to receive a message blockingly fails.
///
/// Always means the channel was closed and drained of every buffered value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecvError;

impl error::Error for RecvError {}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "receiving on a closed and empty channel".fmt(f)
    }
}

/// An error returned when an attempt to receive a message synchronously is
/// unsuccessful.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TryRecvError {
    /// The channel is empty.
    Empty,
    /// The channel is closed and was drained of every buffered value.
    Closed,
}

impl error::Error for TryRecvError {}

impl fmt::Display for TryRecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryRecvError::Empty => "receiving from an empty channel".fmt(f),
            TryRecvError::Closed => "receiving on a closed and empty channel".fmt(f),
        }
    }
}

/// An error returned when [`close`](crate::Channel::close) is called on an
/// already-closed channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CloseError;

impl error::Error for CloseError {}

impl fmt::Display for CloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "channel is already closed".fmt(f)
    }
}

/// An error returned when [`destroy`](crate::Channel::destroy) is called on
/// a channel that has not been closed yet.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DestroyError;

impl error::Error for DestroyError {}

impl fmt::Display for DestroyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "destroy called on an open channel".fmt(f)
    }
}

/// An error returned when [`select`](crate::select::select) resolves to a
/// candidate whose channel was closed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SelectError {
    /// The index, within the candidate slice, of the channel that was
    /// closed.
    pub index: usize,
}

impl error::Error for SelectError {}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "select candidate {} is on a closed channel", self.index)
    }
}

/// An error returned by [`send_timeout`](crate::Channel::send_timeout).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SendTimeoutError<T> {
    /// No slot became available before the deadline.
    Timeout(T),
    /// The channel is closed.
    Closed(T),
}

impl<T: fmt::Debug> error::Error for SendTimeoutError<T> {}

impl<T> fmt::Display for SendTimeoutError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendTimeoutError::Timeout(_) => "timed out sending on a channel".fmt(f),
            SendTimeoutError::Closed(_) => "sending on a closed channel".fmt(f),
        }
    }
}

/// An error returned by [`receive_timeout`](crate::Channel::receive_timeout).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecvTimeoutError {
    /// No value became available before the deadline.
    Timeout,
    /// The channel is closed and was drained of every buffered value.
    Closed,
}

impl error::Error for RecvTimeoutError {}

impl fmt::Display for RecvTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecvTimeoutError::Timeout => "timed out receiving on a channel".fmt(f),
            RecvTimeoutError::Closed => "receiving on a closed and empty channel".fmt(f),
        }
    }
}

/// An error returned by [`select_timeout`](crate::select::select_timeout).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectTimeoutError {
    /// No candidate became ready before the deadline.
    Timeout,
    /// The candidate at `index` was on a closed channel.
    Closed {
        /// The index, within the candidate slice, of the channel that was
        /// closed.
        index: usize,
    },
}

impl error::Error for SelectTimeoutError {}

impl fmt::Display for SelectTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectTimeoutError::Timeout => "select timed out".fmt(f),
            SelectTimeoutError::Closed { index } => {
                write!(f, "select candidate {index} is on a closed channel")
            }
        }
    }
}
