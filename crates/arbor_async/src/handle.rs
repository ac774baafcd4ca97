//! Single-resolution completion handles.
//!
//! An [`AsyncHandle`] is the caller's view of an operation running on a
//! worker. It resolves exactly once, with either a value or an
//! [`ArborError`]. The outcome can be consumed any number of ways: blocking
//! with [`AsyncHandle::get`], registering callbacks, or `.await`ing the handle
//! on any executor. Every observer sees the same outcome.
//!
//! A failure that resolves before anything observed the handle is forwarded
//! to the unhandled-error listener, so no failure is silently dropped.

use crate::error::{ArborError, ArborResult};
use crate::listener::UnhandledErrorListener;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

type Callback<T> = Box<dyn FnOnce(ArborResult<T>) + Send>;

struct State<T> {
    outcome: Option<ArborResult<T>>,
    callbacks: Vec<Callback<T>>,
    wakers: Vec<Waker>,
    observed: bool,
}

struct Shared<T> {
    state: Mutex<State<T>>,
    resolved: Condvar,
}

/// Asynchronous result of one operation.
///
/// Cloning a handle yields another view of the same outcome.
pub struct AsyncHandle<T> {
    shared: Arc<Shared<T>>,
}

/// Write side of an [`AsyncHandle`]. Dropping it unresolved fails the handle
/// with [`ArborError::Abandoned`].
pub(crate) struct Completer<T: Clone> {
    shared: Option<Arc<Shared<T>>>,
    listener: Option<Arc<dyn UnhandledErrorListener>>,
}

/// Creates a linked completer and handle.
///
/// Unobserved failures are reported to `listener`.
pub(crate) fn channel<T: Clone>(
    listener: Option<Arc<dyn UnhandledErrorListener>>,
) -> (Completer<T>, AsyncHandle<T>) {
    let shared = Arc::new(Shared {
        state: Mutex::new(State {
            outcome: None,
            callbacks: Vec::new(),
            wakers: Vec::new(),
            observed: false,
        }),
        resolved: Condvar::new(),
    });
    let completer = Completer {
        shared: Some(Arc::clone(&shared)),
        listener,
    };
    (completer, AsyncHandle { shared })
}

impl<T: Clone> Completer<T> {
    /// Resolves the handle.
    ///
    /// Returns true if an observer was registered before resolution.
    pub(crate) fn complete(mut self, outcome: ArborResult<T>) -> bool {
        match self.shared.take() {
            Some(shared) => resolve(&shared, outcome, self.listener.as_deref()),
            None => false,
        }
    }
}

impl<T: Clone> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            tracing::warn!("operation dropped before completion");
            resolve(&shared, Err(ArborError::Abandoned), self.listener.as_deref());
        }
    }
}

fn resolve<T: Clone>(
    shared: &Shared<T>,
    outcome: ArborResult<T>,
    listener: Option<&dyn UnhandledErrorListener>,
) -> bool {
    let (callbacks, wakers, observed) = {
        let mut state = shared.state.lock();
        if state.outcome.is_some() {
            return state.observed;
        }
        state.outcome = Some(outcome.clone());
        (
            std::mem::take(&mut state.callbacks),
            std::mem::take(&mut state.wakers),
            state.observed,
        )
    };
    shared.resolved.notify_all();

    if let (Err(error), false, Some(listener)) = (&outcome, observed, listener) {
        tracing::warn!(error = %error, "routing unobserved failure to listener");
        listener.unhandled_error("operation failed with no observer", error);
    }

    for waker in wakers {
        waker.wake();
    }
    for callback in callbacks {
        run_callback(callback, outcome.clone());
    }
    observed
}

fn run_callback<T>(callback: impl FnOnce(ArborResult<T>), outcome: ArborResult<T>) {
    if panic::catch_unwind(AssertUnwindSafe(move || callback(outcome))).is_err() {
        tracing::error!("completion callback panicked");
    }
}

impl<T: Clone> AsyncHandle<T> {
    /// Creates a handle that is already resolved with `value`.
    pub fn completed(value: T) -> Self {
        Self::resolved(Ok(value))
    }

    /// Creates a handle that is already failed with `error`.
    pub fn failed(error: ArborError) -> Self {
        Self::resolved(Err(error))
    }

    fn resolved(outcome: ArborResult<T>) -> Self {
        let (completer, handle) = channel(None);
        completer.complete(outcome);
        handle
    }

    /// Registers a callback run with the outcome.
    ///
    /// Runs on the resolving worker, or immediately on the calling thread if
    /// the handle is already resolved. A panicking callback is logged and
    /// never unwinds into the caller.
    pub fn on_complete<F>(&self, callback: F)
    where
        F: FnOnce(ArborResult<T>) + Send + 'static,
    {
        let mut state = self.shared.state.lock();
        state.observed = true;
        if let Some(outcome) = state.outcome.clone() {
            drop(state);
            run_callback(callback, outcome);
            return;
        }
        state.callbacks.push(Box::new(callback));
    }

    /// Blocks until the operation resolves.
    pub fn get(&self) -> ArborResult<T> {
        let mut state = self.shared.state.lock();
        state.observed = true;
        loop {
            if let Some(outcome) = &state.outcome {
                return outcome.clone();
            }
            self.shared.resolved.wait(&mut state);
        }
    }

    /// Blocks until the operation resolves or `timeout` elapses.
    ///
    /// Returns `None` on timeout. The handle stays observed either way.
    pub fn get_timeout(&self, timeout: Duration) -> Option<ArborResult<T>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        state.observed = true;
        loop {
            if let Some(outcome) = &state.outcome {
                return Some(outcome.clone());
            }
            if self
                .shared
                .resolved
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                return state.outcome.clone();
            }
        }
    }

    /// Returns the outcome if already resolved, without blocking.
    ///
    /// Peeking does not count as observing; a failure that resolves later
    /// still reaches the unhandled-error listener.
    pub fn try_get(&self) -> Option<ArborResult<T>> {
        self.shared.state.lock().outcome.clone()
    }

    /// Returns true once the operation has resolved.
    pub fn is_done(&self) -> bool {
        self.shared.state.lock().outcome.is_some()
    }
}

impl<T> Clone for AsyncHandle<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for AsyncHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        let status = match &state.outcome {
            None => "pending",
            Some(Ok(_)) => "complete",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("AsyncHandle")
            .field("status", &status)
            .field("observed", &state.observed)
            .finish()
    }
}

impl<T: Clone> Future for AsyncHandle<T> {
    type Output = ArborResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.state.lock();
        state.observed = true;
        if let Some(outcome) = &state.outcome {
            return Poll::Ready(outcome.clone());
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}
