//! Unhandled-error listeners.
//!
//! A listener receives failures that could not be delivered to a caller:
//! operations that failed before anyone observed their handle, and invariant
//! violations inside the executor.

use crate::error::ArborError;
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// Receives failures no caller is positioned to handle.
pub trait UnhandledErrorListener: Send + Sync {
    /// Called once per unhandled failure.
    fn unhandled_error(&self, message: &str, error: &ArborError);
}

impl<F> UnhandledErrorListener for F
where
    F: Fn(&str, &ArborError) + Send + Sync,
{
    fn unhandled_error(&self, message: &str, error: &ArborError) {
        self(message, error)
    }
}

/// Default listener: logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl UnhandledErrorListener for LoggingListener {
    fn unhandled_error(&self, message: &str, error: &ArborError) {
        tracing::error!(error = %error, class = ?error.class(), "{message}");
    }
}

/// A listener that keeps every notification, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingListener {
    errors: Mutex<Vec<ArborError>>,
    changed: Condvar,
}

impl RecordingListener {
    /// Creates an empty listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded errors.
    pub fn errors(&self) -> Vec<ArborError> {
        self.errors.lock().clone()
    }

    /// Returns the number of notifications received.
    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits until at least `count` notifications arrived.
    ///
    /// Returns false if `timeout` elapsed first.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut errors = self.errors.lock();
        while errors.len() < count {
            if self.changed.wait_until(&mut errors, deadline).timed_out() {
                return errors.len() >= count;
            }
        }
        true
    }
}

impl UnhandledErrorListener for RecordingListener {
    fn unhandled_error(&self, _message: &str, error: &ArborError) {
        self.errors.lock().push(error.clone());
        self.changed.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn closures_are_listeners() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let listener = move |_: &str, _: &ArborError| {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        listener.unhandled_error("failed", &ArborError::Abandoned);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn recording_listener_waits() {
        let listener = Arc::new(RecordingListener::new());
        assert!(listener.is_empty());
        assert!(!listener.wait_for(1, Duration::from_millis(10)));

        let producer = Arc::clone(&listener);
        let handle = thread::spawn(move || {
            producer.unhandled_error("failed", &ArborError::Abandoned);
        });
        assert!(listener.wait_for(1, Duration::from_secs(5)));
        handle.join().unwrap();
        assert_eq!(listener.errors(), vec![ArborError::Abandoned]);
    }
}
