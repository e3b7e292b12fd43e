//! Async adapter.
//!
//! [`PromiseFuture`] lets a promise be awaited: the adapter registers
//! one ordinary listener that stores the outcome and wakes whichever
//! waker the executor parked, so the cell needs no knowledge of async
//! at all.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::{Outcome, Promise};

struct Shared<T> {
    outcome: Option<Outcome<T>>,
    waker: Option<Waker>,
}

/// A future resolving to a promise's [`Outcome`].
///
/// # Examples
///
/// ```
/// use promise_cell::Deferred;
/// use futures::executor::block_on;
/// use std::thread;
/// let (deferred, promise) = Deferred::<String>::new();
/// let fut = promise.future();
/// let task1 = thread::spawn(move || {
///     block_on(async {
///         println!("Received {:?}", fut.await);
///     })
/// });
/// deferred.resolve("Hi".into());
/// task1.join().expect("The task1 thread has panicked.");
/// ```
pub struct PromiseFuture<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Promise<T> {
    /// An awaitable view of this promise. Each call returns an
    /// independent future with its own copy of the outcome.
    pub fn future(&self) -> PromiseFuture<T> {
        let shared = Arc::new(Mutex::new(Shared {
            outcome: None,
            waker: None,
        }));
        let stored = shared.clone();
        self.on_complete(move |outcome| {
            let waker = {
                let mut shared = stored.lock();
                shared.outcome = Some(outcome.clone());
                shared.waker.take()
            };
            // Wake outside the lock.
            if let Some(waker) = waker {
                waker.wake();
            }
        });
        PromiseFuture { shared }
    }
}

impl<T: Clone> Future for PromiseFuture<T> {
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut shared = self.shared.lock();
        match shared.outcome.as_ref() {
            Some(outcome) => Poll::Ready(outcome.clone()),
            None => {
                shared.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Deferred, Fault, Promise};
    use futures::executor::block_on;
    use std::thread;

    #[test]
    fn awaits_a_value_resolved_on_another_thread() {
        let (deferred, promise) = Deferred::<String>::new();
        let fut = promise.future();
        let task1 = thread::spawn(move || block_on(async { fut.await }));
        let task2 = thread::spawn(move || {
            deferred.resolve(String::from("🍓"));
        });
        assert_eq!(
            task1.join().expect("The task1 thread has panicked"),
            Ok(String::from("🍓"))
        );
        task2.join().expect("The task2 thread has panicked");
    }

    #[test]
    fn resolves_immediately_on_a_complete_cell() {
        let outcome = block_on(Promise::resolved(1).future());
        assert_eq!(outcome, Ok(1));
    }

    #[test]
    fn carries_the_fault_through() {
        let outcome = block_on(Promise::<i32>::rejected(Fault::new("boom")).future());
        assert_eq!(outcome, Err(Fault::new("boom")));
    }

    #[test]
    fn two_futures_each_observe_the_outcome() {
        let (deferred, promise) = Deferred::new();
        let first = promise.future();
        let second = promise.future();
        let task1 = thread::spawn(move || block_on(async { first.await }));
        let task2 = thread::spawn(move || block_on(async { second.await }));
        deferred.resolve(2);
        assert_eq!(task1.join().expect("The task1 thread has panicked"), Ok(2));
        assert_eq!(task2.join().expect("The task2 thread has panicked"), Ok(2));
    }
}
