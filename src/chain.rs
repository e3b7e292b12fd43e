//! Chaining combinators.
//!
//! Every combinator follows the same recipe: create a fresh cell,
//! register a single reaction on the source, return the new cell's
//! read-only half immediately. User closures express failure by
//! returning `Err`; the machinery converts that into a rejection of
//! the result cell, so a reaction can never crash the thread that
//! happens to deliver it.

use crate::{Deferred, Fault, Outcome, Promise};

impl<T: Send + Sync + 'static> Promise<T> {
    /// Transforms the success value.
    ///
    /// On source success `transform` runs; its `Ok` resolves the
    /// result and its `Err` rejects it. A source failure propagates
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use promise_cell::{Fault, Promise};
    /// let doubled = Promise::resolved(5).map(|n| Ok::<_, Fault>(n * 2));
    /// assert_eq!(doubled.waiter().get().unwrap(), 10);
    /// ```
    pub fn map<U, F>(&self, transform: F) -> Promise<U>
    where
        U: Send + Sync + 'static,
        F: FnOnce(&T) -> Result<U, Fault> + Send + 'static,
    {
        let (deferred, promise) = Deferred::new();
        self.on_complete(move |outcome| match outcome {
            Ok(value) => match transform(value) {
                Ok(mapped) => {
                    deferred.resolve(mapped);
                }
                Err(fault) => {
                    deferred.reject(fault);
                }
            },
            Err(fault) => {
                deferred.reject(fault.clone());
            }
        });
        promise
    }

    /// Chains a promise-returning continuation.
    ///
    /// On source success `bind` runs; the promise it returns forwards
    /// its eventual outcome to the result. An `Err` from `bind` itself
    /// rejects the result immediately. A source failure propagates
    /// unchanged.
    pub fn and_then<U, F>(&self, bind: F) -> Promise<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(&T) -> Result<Promise<U>, Fault> + Send + 'static,
    {
        let (deferred, promise) = Deferred::new();
        self.on_complete(move |outcome| match outcome {
            Ok(value) => match bind(value) {
                Ok(inner) => inner.on_complete(move |forwarded| {
                    match forwarded {
                        Ok(inner_value) => {
                            deferred.resolve(inner_value.clone());
                        }
                        Err(fault) => {
                            deferred.reject(fault.clone());
                        }
                    }
                }),
                Err(fault) => {
                    deferred.reject(fault);
                }
            },
            Err(fault) => {
                deferred.reject(fault.clone());
            }
        });
        promise
    }

    /// Recovers from a failure.
    ///
    /// On source failure `recover` runs; its `Ok` becomes the result's
    /// success value. A source success passes through unchanged. If
    /// `recover` itself fails, the new fault rejects the result with
    /// the original cause attached as its suppressed cause.
    ///
    /// # Examples
    ///
    /// ```
    /// use promise_cell::{Fault, Promise};
    /// let recovered = Promise::<i32>::rejected(Fault::new("boom"))
    ///     .or_else(|_| Ok(0));
    /// assert_eq!(recovered.waiter().get().unwrap(), 0);
    /// ```
    pub fn or_else<F>(&self, recover: F) -> Promise<T>
    where
        T: Clone,
        F: FnOnce(&Fault) -> Result<T, Fault> + Send + 'static,
    {
        let (deferred, promise) = Deferred::new();
        self.on_complete(move |outcome| match outcome {
            Ok(value) => {
                deferred.resolve(value.clone());
            }
            Err(fault) => match recover(fault) {
                Ok(substitute) => {
                    deferred.resolve(substitute);
                }
                Err(next) => {
                    deferred.reject(next.suppress(fault.clone()));
                }
            },
        });
        promise
    }

    /// Runs `cleanup` on both outcomes.
    ///
    /// The body sees `(Some(value), None)` or `(None, Some(cause))`
    /// and its `Ok` becomes the result's success value either way, so
    /// a finally can swallow a failure or convert it to a value. An
    /// `Err` from the body rejects the result, suppressing the
    /// original cause when the source had failed.
    pub fn finally<U, F>(&self, cleanup: F) -> Promise<U>
    where
        U: Send + Sync + 'static,
        F: FnOnce(Option<&T>, Option<&Fault>) -> Result<U, Fault> + Send + 'static,
    {
        let (deferred, promise) = Deferred::new();
        self.on_complete(move |outcome| match outcome {
            Ok(value) => match cleanup(Some(value), None) {
                Ok(result) => {
                    deferred.resolve(result);
                }
                Err(fault) => {
                    deferred.reject(fault);
                }
            },
            Err(fault) => match cleanup(None, Some(fault)) {
                Ok(result) => {
                    deferred.resolve(result);
                }
                Err(next) => {
                    deferred.reject(next.suppress(fault.clone()));
                }
            },
        });
        promise
    }

    /// Runs a side effect and forwards the original outcome.
    ///
    /// The outcome passes through unchanged unless `effect` fails, in
    /// which case the new fault rejects the result — with the original
    /// cause suppressed when the source had failed.
    pub fn inspect<F>(&self, effect: F) -> Promise<T>
    where
        T: Clone,
        F: FnOnce(&Outcome<T>) -> Result<(), Fault> + Send + 'static,
    {
        let (deferred, promise) = Deferred::new();
        self.on_complete(move |outcome| match effect(outcome) {
            Ok(()) => match outcome {
                Ok(value) => {
                    deferred.resolve(value.clone());
                }
                Err(fault) => {
                    deferred.reject(fault.clone());
                }
            },
            Err(raised) => match outcome {
                Ok(_) => {
                    deferred.reject(raised);
                }
                Err(fault) => {
                    deferred.reject(raised.suppress(fault.clone()));
                }
            },
        });
        promise
    }
}
