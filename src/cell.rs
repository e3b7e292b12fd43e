//! The completion cell: a one-shot holder for a deferred outcome and
//! the listeners waiting on it.
//!
//! A cell is created pending and moves exactly once to either a value
//! or a [`Fault`]; the first of any number of racing `resolve`/`reject`
//! calls wins and everyone else is told `false`. Listeners may arrive
//! before, during, or after that transition and are each delivered
//! exactly once, on whichever thread completes or registers later.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crossbeam_queue::SegQueue;

use crate::Fault;

/// The terminal outcome of a cell.
pub type Outcome<T> = Result<T, Fault>;

type Reaction<T> = Box<dyn FnOnce(&Outcome<T>) + Send>;

/// A queued listener wrapped in its one-shot delivery guard.
///
/// Whichever of the completing thread and the registering thread
/// reaches a listener first delivers it; the guard turns the other
/// party's attempt into a no-op.
struct Armed<T> {
    fired: AtomicBool,
    reaction: Option<Reaction<T>>,
}

impl<T> Armed<T> {
    fn new(reaction: Reaction<T>) -> Self {
        Self {
            fired: AtomicBool::new(false),
            reaction: Some(reaction),
        }
    }

    fn fire(mut self, outcome: &Outcome<T>) {
        if self.fired.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(reaction) = self.reaction.take() {
            reaction(outcome);
        }
    }
}

/// Shared state behind a [`Deferred`]/[`Promise`] pair.
pub(crate) struct Cell<T> {
    outcome: OnceLock<Outcome<T>>,
    queue: SegQueue<Armed<T>>,
}

impl<T> Cell<T> {
    fn new() -> Self {
        Self {
            outcome: OnceLock::new(),
            queue: SegQueue::new(),
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Publishes the terminal outcome. The first caller wins and
    /// drains the listener queue; later callers return `false` with
    /// no side effects.
    pub(crate) fn complete(&self, outcome: Outcome<T>) -> bool {
        if self.outcome.set(outcome).is_err() {
            return false;
        }
        self.drain();
        true
    }

    /// Registers a reaction.
    ///
    /// Fires inline when the cell is already complete. Otherwise the
    /// reaction is enqueued and the state re-read: a completion can
    /// land on another thread between the first read and the enqueue,
    /// and without the re-check a listener pushed just after that
    /// transition would wait forever. Draining from both sides is safe
    /// because every queued listener carries its own one-shot guard.
    pub(crate) fn listen(&self, reaction: Reaction<T>) {
        if let Some(outcome) = self.outcome.get() {
            reaction(outcome);
            return;
        }
        self.queue.push(Armed::new(reaction));
        if self.outcome.get().is_some() {
            self.drain();
        }
    }

    fn drain(&self) {
        let Some(outcome) = self.outcome.get() else {
            return;
        };
        while let Some(armed) = self.queue.pop() {
            armed.fire(outcome);
        }
    }
}

/// The producing half of a completion cell.
///
/// A `Deferred` may be cloned and completed from any thread; exactly
/// one `resolve`/`reject` call across all clones ever returns `true`.
///
/// # Examples
///
/// ```
/// use promise_cell::Deferred;
/// use std::thread;
/// let (deferred, promise) = Deferred::<String>::new();
/// let task1 = thread::spawn(move || {
///     promise.on_complete(|outcome| println!("Received {:?}", outcome));
/// });
/// deferred.resolve("Hi".into());
/// task1.join().expect("The task1 thread has panicked.");
/// ```
pub struct Deferred<T> {
    cell: Arc<Cell<T>>,
}

/// The consuming half of a completion cell.
///
/// A `Promise` observes the outcome but can never set it. It may be
/// cloned freely; every clone sees the same cell.
pub struct Promise<T> {
    cell: Arc<Cell<T>>,
}

impl<T> Deferred<T> {
    /// Creates a pending cell and returns both halves.
    pub fn new() -> (Deferred<T>, Promise<T>) {
        let cell = Arc::new(Cell::new());
        (
            Deferred { cell: cell.clone() },
            Promise { cell },
        )
    }

    /// Completes the cell with `value`. Returns `true` iff this call
    /// performed the pending-to-succeeded transition.
    pub fn resolve(&self, value: T) -> bool {
        self.cell.complete(Ok(value))
    }

    /// Completes the cell with `fault`. Returns `true` iff this call
    /// performed the pending-to-failed transition.
    pub fn reject(&self, fault: Fault) -> bool {
        self.cell.complete(Err(fault))
    }

    /// Whether the cell has left the pending state.
    pub fn is_complete(&self) -> bool {
        self.cell.is_complete()
    }

    /// Another read-only handle on the same cell.
    pub fn promise(&self) -> Promise<T> {
        Promise {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Promise<T> {
    /// Whether the cell has left the pending state.
    pub fn is_complete(&self) -> bool {
        self.cell.is_complete()
    }

    /// Registers a reaction to the cell's outcome.
    ///
    /// If the cell is already complete the reaction runs synchronously
    /// on the calling thread. If it is pending, the reaction is queued
    /// and runs exactly once on whichever thread later completes the
    /// cell. No ordering is guaranteed between reactions.
    pub fn on_complete<F>(&self, reaction: F)
    where
        F: FnOnce(&Outcome<T>) + Send + 'static,
    {
        self.cell.listen(Box::new(reaction));
    }

    /// A promise that is already succeeded with `value`.
    pub fn resolved(value: T) -> Promise<T> {
        let (deferred, promise) = Deferred::new();
        deferred.resolve(value);
        promise
    }

    /// A promise that is already failed with `fault`.
    pub fn rejected(fault: Fault) -> Promise<T> {
        let (deferred, promise) = Deferred::new();
        deferred.reject(fault);
        promise
    }

    /// Runs `produce` eagerly on the calling thread and returns a
    /// promise already completed with its result.
    ///
    /// # Examples
    ///
    /// ```
    /// use promise_cell::{Fault, Promise};
    /// let promise = Promise::of(|| Ok::<_, Fault>(3));
    /// assert!(promise.is_complete());
    /// ```
    pub fn of<F>(produce: F) -> Promise<T>
    where
        F: FnOnce() -> Result<T, Fault>,
    {
        match produce() {
            Ok(value) => Promise::resolved(value),
            Err(fault) => Promise::rejected(fault),
        }
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("complete", &self.is_complete())
            .finish()
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("complete", &self.is_complete())
            .finish()
    }
}
