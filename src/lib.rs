//! One-shot completion cells with promise chaining.
//!
//! A [`Deferred`] is the producing half of a cell: it can complete the
//! cell exactly once, with a value or a [`Fault`], from any thread.
//! The [`Promise`] half observes the outcome: reactions registered
//! with [`Promise::on_complete`] fire exactly once whether they arrive
//! before or after completion, and combinators ([`Promise::map`],
//! [`Promise::and_then`], [`Promise::or_else`], [`Promise::finally`],
//! [`Promise::inspect`]) chain new cells onto old ones without ever
//! blocking.
//!
//! Delivery is synchronous on whichever thread completes the cell or
//! registers late; wrap a reaction with [`Promise::on_complete_via`]
//! when it should run on a [`Dispatcher`] instead. Blocking consumers
//! go through [`Promise::waiter`], async ones through
//! [`Promise::future`].
//!
//! # Examples
//!
//! ```
//! use promise_cell::{Deferred, Fault};
//! use std::thread;
//!
//! let (deferred, promise) = Deferred::<i32>::new();
//! let waiter = promise.map(|n| Ok::<_, Fault>(n * 2)).waiter();
//!
//! let task = thread::spawn(move || {
//!     deferred.resolve(21);
//! });
//!
//! assert_eq!(waiter.get().unwrap(), 42);
//! task.join().expect("The completer thread has panicked.");
//! ```

mod cell;
mod chain;
mod dispatch;
mod fault;
mod future;
mod wait;

pub use cell::{Deferred, Outcome, Promise};
pub use dispatch::{Dispatcher, ThreadDispatcher};
pub use fault::Fault;
pub use future::PromiseFuture;
pub use wait::{WaitError, Waiter};
