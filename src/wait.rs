//! Blocking bridge.
//!
//! A [`Waiter`] converts a promise's completion into a one-shot gate a
//! thread can block on, with an optional bound on the wait. It is the
//! only place in the crate where a caller suspends; the cell itself
//! never blocks anyone.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

use crate::{Fault, Promise};

/// Errors surfaced by a [`Waiter`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The promise failed; the cell's fault is carried as the source.
    #[error("promise failed")]
    Failed(#[source] Fault),
    /// The wait bound elapsed before the promise completed.
    #[error("timed out waiting for completion")]
    TimedOut,
}

struct Gate<T> {
    slot: Mutex<Option<Result<T, Fault>>>,
    opened: Condvar,
}

/// A blocking handle over a promise's completion.
///
/// The waiter holds its own copy of the outcome once the cell
/// completes; timing out consumes nothing, and a later [`get`]
/// still succeeds once the outcome arrives.
///
/// [`get`]: Waiter::get
///
/// # Examples
///
/// ```
/// use promise_cell::Deferred;
/// use std::thread;
/// let (deferred, promise) = Deferred::<String>::new();
/// let waiter = promise.waiter();
/// thread::spawn(move || {
///     deferred.resolve("Hi".into());
/// });
/// assert_eq!(waiter.get().unwrap(), "Hi");
/// ```
pub struct Waiter<T> {
    gate: Arc<Gate<T>>,
}

impl<T: Clone + Send + Sync + 'static> Promise<T> {
    /// Bridges this promise to blocking consumers.
    pub fn waiter(&self) -> Waiter<T> {
        let gate = Arc::new(Gate {
            slot: Mutex::new(None),
            opened: Condvar::new(),
        });
        let stored = gate.clone();
        self.on_complete(move |outcome| {
            *stored.slot.lock() = Some(outcome.clone());
            stored.opened.notify_all();
        });
        Waiter { gate }
    }
}

impl<T: Clone> Waiter<T> {
    /// Whether the outcome has arrived. When `true`, [`get`] will not
    /// block.
    ///
    /// [`get`]: Waiter::get
    pub fn is_complete(&self) -> bool {
        self.gate.slot.lock().is_some()
    }

    /// Blocks the calling thread until the promise completes, then
    /// returns the value or the wrapped fault.
    pub fn get(&self) -> Result<T, WaitError> {
        let mut slot = self.gate.slot.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return Self::reap(outcome);
            }
            self.gate.opened.wait(&mut slot);
        }
    }

    /// Blocks for at most `timeout`. Returns [`WaitError::TimedOut`]
    /// if the gate stays closed that long; the underlying cell is
    /// untouched either way.
    pub fn get_timeout(&self, timeout: Duration) -> Result<T, WaitError> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.gate.slot.lock();
        loop {
            if let Some(outcome) = slot.as_ref() {
                return Self::reap(outcome);
            }
            if self.gate.opened.wait_until(&mut slot, deadline).timed_out() {
                return match slot.as_ref() {
                    Some(outcome) => Self::reap(outcome),
                    None => Err(WaitError::TimedOut),
                };
            }
        }
    }

    fn reap(outcome: &Result<T, Fault>) -> Result<T, WaitError> {
        outcome.clone().map_err(WaitError::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::WaitError;
    use crate::{Deferred, Fault, Promise};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn get_returns_immediately_on_a_succeeded_cell() {
        let waiter = Promise::resolved(11).waiter();
        assert!(waiter.is_complete());
        assert_eq!(waiter.get().unwrap(), 11);
    }

    #[test]
    fn get_wraps_the_fault_of_a_failed_cell() {
        let waiter = Promise::<i32>::rejected(Fault::new("boom")).waiter();
        assert_eq!(
            waiter.get(),
            Err(WaitError::Failed(Fault::new("boom")))
        );
    }

    #[test]
    fn zero_timeout_on_a_pending_cell_times_out() {
        let (deferred, promise) = Deferred::new();
        let waiter = promise.waiter();
        assert_eq!(
            waiter.get_timeout(Duration::ZERO),
            Err(WaitError::TimedOut)
        );
        // The timeout had no effect on the cell.
        assert!(deferred.resolve(3));
        assert_eq!(waiter.get().unwrap(), 3);
    }

    #[test]
    fn get_may_be_called_again_after_a_timeout() {
        let (deferred, promise) = Deferred::new();
        let waiter = promise.waiter();
        assert_eq!(
            waiter.get_timeout(Duration::from_millis(10)),
            Err(WaitError::TimedOut)
        );
        deferred.resolve(5);
        assert_eq!(waiter.get_timeout(Duration::ZERO).unwrap(), 5);
        assert_eq!(waiter.get().unwrap(), 5);
    }

    #[test]
    fn get_blocks_until_a_thread_resolves() {
        let (deferred, promise) = Deferred::<String>::new();
        let waiter = promise.waiter();
        let completer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            deferred.resolve("eventually".into());
        });
        assert_eq!(waiter.get().unwrap(), "eventually");
        completer.join().expect("The completer thread has panicked");
    }
}
