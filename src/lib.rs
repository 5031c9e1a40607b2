//! A bounded, thread-safe, multi-producer multi-consumer channel with a
//! multi-way `select` primitive.
//!
//! A [`Channel<T>`] is a single handle — cloned freely across threads — that
//! can both send and receive. Any number of producers and consumers may
//! share the same channel concurrently; delivery is FIFO and every message
//! is delivered to exactly one receiver.
//!
//! # Closing
//!
//! [`Channel::close`] closes the channel for every handle at once: once
//! closed, `send` fails immediately (or, for `try_send`, regardless of
//! whether the buffer also happens to be full), while `receive` keeps
//! draining any values still buffered and only then starts failing. Closing
//! is a one-shot transition — a second `close` call returns
//! [`CloseError`](error::CloseError).
//!
//! # Select
//!
//! [`select::select`] lets a thread block on several send/receive
//! candidates, possibly spanning different channels, and proceed with
//! whichever one becomes ready first. See the [`select`] module for details.
//!
//! # Example
//!
//! ```
//! use chanlet::channel;
//! use std::thread;
//!
//! let ch = channel(4);
//! let sender = ch.clone();
//!
//! let handle = thread::spawn(move || {
//!     sender.send("hello").unwrap();
//! });
//!
//! assert_eq!(ch.receive(), Ok("hello"));
//! handle.join().unwrap();
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

mod buffer;
mod channel;
pub mod error;
mod registry;
pub mod select;
mod semaphore;

pub use channel::{channel, Channel};
pub use error::{
    CloseError, DestroyError, RecvError, RecvTimeoutError, SelectError, SelectTimeoutError,
    SendError, SendTimeoutError, TryRecvError, TrySendError,
};
pub use select::{select, select_timeout, Candidate, Outcome};
