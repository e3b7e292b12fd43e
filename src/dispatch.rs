//! Executor decoration for reactions.
//!
//! The cell always delivers synchronously on the completing or
//! registering thread; callers wanting isolation wrap a reaction so
//! delivery merely hands an owned copy of the outcome to a
//! [`Dispatcher`]. The cell itself stays executor-agnostic.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use tracing::warn;

use crate::{Outcome, Promise};

/// Submits jobs for execution somewhere other than the calling thread.
pub trait Dispatcher: Send + Sync {
    /// Runs `job`, now or later, on a thread of the dispatcher's
    /// choosing.
    fn dispatch(&self, job: Box<dyn FnOnce() + Send>);
}

/// Runs every job on a freshly spawned thread.
#[derive(Debug, Default)]
pub struct ThreadDispatcher;

impl Dispatcher for ThreadDispatcher {
    fn dispatch(&self, job: Box<dyn FnOnce() + Send>) {
        thread::spawn(job);
    }
}

impl<T: Clone + Send + Sync + 'static> Promise<T> {
    /// Registers a reaction that runs on `dispatcher` instead of the
    /// delivering thread.
    ///
    /// The reaction receives its own copy of the outcome. A panic
    /// inside a dispatched reaction is trapped and logged; it never
    /// unwinds into the dispatcher's worker.
    pub fn on_complete_via<D, F>(&self, dispatcher: Arc<D>, reaction: F)
    where
        D: Dispatcher + ?Sized + 'static,
        F: FnOnce(&Outcome<T>) + Send + 'static,
    {
        self.on_complete(move |outcome| {
            let owned = outcome.clone();
            dispatcher.dispatch(Box::new(move || {
                if catch_unwind(AssertUnwindSafe(|| reaction(&owned))).is_err() {
                    warn!("completion reaction panicked on dispatcher");
                }
            }));
        });
    }
}
