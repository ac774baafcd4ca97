//! Completion bridge.
//!
//! Runs a blocking executor call on a worker and turns its outcome into an
//! [`AsyncHandle`]. The bridge is the only place that touches workers: the
//! builders hand it a thunk and get a handle back.
//!
//! Failures are routed in one of three ways:
//! - delivered to the observers of the handle;
//! - sent to the unhandled-error listener when nobody observed the handle;
//! - for executor invariant violations (panics, mismatched results), also
//!   sent to the listener when observed, so they are never lost in a
//!   caller's generic error path.

use crate::config::{ClientConfig, Dispatch};
use crate::error::{ArborError, ArborResult};
use crate::handle::{channel, AsyncHandle, Completer};
use crate::listener::UnhandledErrorListener;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

/// Adapts blocking executor calls into [`AsyncHandle`]s.
#[derive(Clone)]
pub struct CompletionBridge {
    dispatch: Dispatch,
    thread_name: String,
    listener: Arc<dyn UnhandledErrorListener>,
}

impl CompletionBridge {
    /// Creates a bridge for `config` reporting to `listener`.
    pub fn new(config: &ClientConfig, listener: Arc<dyn UnhandledErrorListener>) -> Self {
        Self {
            dispatch: config.dispatch.clone(),
            thread_name: config.thread_name.clone(),
            listener,
        }
    }

    /// Replaces the unhandled-error listener.
    #[must_use]
    pub fn with_listener(mut self, listener: Arc<dyn UnhandledErrorListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Returns the unhandled-error listener.
    pub fn listener(&self) -> &Arc<dyn UnhandledErrorListener> {
        &self.listener
    }

    /// Runs `thunk` on a worker and returns a handle to its outcome.
    ///
    /// `operation` names the call in logs. The thunk runs exactly once; a
    /// panic inside it fails the handle with
    /// [`ArborError::ExecutorPanicked`].
    pub fn call<T, F>(&self, operation: &'static str, thunk: F) -> AsyncHandle<T>
    where
        T: Clone + Send + 'static,
        F: FnOnce() -> ArborResult<T> + Send + 'static,
    {
        let (completer, handle) = channel(Some(Arc::clone(&self.listener)));
        let slot = Arc::new(Mutex::new(Some(completer)));

        let worker_slot = Arc::clone(&slot);
        let listener = Arc::clone(&self.listener);
        let job = move || {
            if let Some(completer) = worker_slot.lock().take() {
                run(operation, completer, thunk, listener.as_ref());
            }
        };

        tracing::debug!(operation, "dispatching operation");
        let spawned = match &self.dispatch {
            Dispatch::Thread => thread::Builder::new()
                .name(self.thread_name.clone())
                .spawn(job)
                .map(drop),
            Dispatch::Tokio(runtime) => {
                drop(runtime.spawn_blocking(job));
                Ok(())
            }
        };

        if let Err(e) = spawned {
            tracing::error!(operation, error = %e, "failed to start worker");
            if let Some(completer) = slot.lock().take() {
                completer.complete(Err(ArborError::Dispatch {
                    message: e.to_string(),
                }));
            }
        }
        handle
    }
}

impl fmt::Debug for CompletionBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionBridge")
            .field("dispatch", &self.dispatch)
            .field("thread_name", &self.thread_name)
            .finish_non_exhaustive()
    }
}

fn run<T, F>(
    operation: &'static str,
    completer: Completer<T>,
    thunk: F,
    listener: &dyn UnhandledErrorListener,
) where
    T: Clone,
    F: FnOnce() -> ArborResult<T>,
{
    let outcome = match panic::catch_unwind(AssertUnwindSafe(thunk)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(operation, %message, "executor panicked");
            Err(ArborError::ExecutorPanicked { message })
        }
    };

    match &outcome {
        Ok(_) => tracing::debug!(operation, "operation completed"),
        Err(e) => tracing::debug!(operation, error = %e, "operation failed"),
    }

    let violation = outcome.as_ref().err().filter(|e| e.is_internal()).cloned();
    let observed = completer.complete(outcome);
    // Unobserved failures were already reported by the completer.
    if let (Some(error), true) = (violation, observed) {
        listener.unhandled_error("executor invariant violated", &error);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::RecordingListener;
    use arbor_proto::ErrorCode;
    use std::sync::mpsc;
    use std::time::Duration;

    fn bridge(config: &ClientConfig) -> (CompletionBridge, Arc<RecordingListener>) {
        let listener = Arc::new(RecordingListener::new());
        (CompletionBridge::new(config, listener.clone()), listener)
    }

    #[test]
    fn value_is_delivered() {
        let (bridge, listener) = bridge(&ClientConfig::default());
        let handle = bridge.call("create", || Ok("/a".to_string()));
        assert_eq!(handle.get(), Ok("/a".to_string()));
        assert!(listener.is_empty());
    }

    #[test]
    fn runs_on_named_worker() {
        let config = ClientConfig::new().with_thread_name("arbor-test-worker");
        let (bridge, _) = bridge(&config);
        let handle = bridge.call("create", || {
            Ok(thread::current().name().map(str::to_string))
        });
        assert_eq!(handle.get(), Ok(Some("arbor-test-worker".to_string())));
    }

    #[test]
    fn observed_rejection_reaches_only_the_observer() {
        let (bridge, listener) = bridge(&ClientConfig::default());
        let (tx, rx) = mpsc::channel::<()>();
        let handle = bridge.call::<(), _>("delete", move || {
            let _ = rx.recv();
            Err(ArborError::operation(ErrorCode::NoNode, "/a"))
        });
        handle.on_complete(|_| {});
        tx.send(()).unwrap();
        assert_eq!(handle.get().unwrap_err().code(), Some(ErrorCode::NoNode));
        assert!(listener.is_empty());
    }

    #[test]
    fn unobserved_rejection_reaches_listener() {
        let (bridge, listener) = bridge(&ClientConfig::default());
        let _handle = bridge.call::<(), _>("delete", || {
            Err(ArborError::operation(ErrorCode::NoNode, "/a"))
        });
        assert!(listener.wait_for(1, Duration::from_secs(5)));
        assert_eq!(
            listener.errors()[0],
            ArborError::operation(ErrorCode::NoNode, "/a")
        );
    }

    #[test]
    fn panic_is_reported_exactly_once() {
        let (bridge, listener) = bridge(&ClientConfig::default());
        let (tx, rx) = mpsc::channel::<()>();
        let handle = bridge.call::<u8, _>("create", move || {
            let _ = rx.recv();
            panic!("executor bug")
        });
        handle.on_complete(|_| {});
        tx.send(()).unwrap();
        assert_eq!(
            handle.get(),
            Err(ArborError::ExecutorPanicked {
                message: "executor bug".into()
            })
        );
        assert!(listener.wait_for(1, Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(20));
        assert_eq!(listener.len(), 1);
    }

    #[test]
    fn tokio_dispatch() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let config = ClientConfig::new().with_tokio(runtime.handle().clone());
        let (bridge, _) = bridge(&config);
        let handle = bridge.call("exists", || Ok(None::<u32>));
        assert_eq!(handle.get(), Ok(None));
    }

    #[test]
    fn panic_messages() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&5u8), "non-string panic payload");
    }
}
