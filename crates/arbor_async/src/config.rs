//! Client configuration.

use tokio::runtime::Handle;

/// Where the completion bridge runs blocking executor calls.
///
/// Prefer [`Dispatch::Tokio`] whenever a runtime is available; see
/// [`Dispatch::current`].
#[derive(Debug, Clone, Default)]
pub enum Dispatch {
    /// One named OS thread per operation.
    ///
    /// Threads are neither pooled nor bounded: every pending operation holds
    /// a thread and its stack until the executor call returns. Suitable for
    /// low-rate callers without a runtime.
    #[default]
    Thread,
    /// The blocking pool of a tokio runtime, which reuses and caps threads.
    Tokio(Handle),
}

impl Dispatch {
    /// Uses the blocking pool of the current tokio runtime, or falls back to
    /// [`Dispatch::Thread`] outside one.
    #[must_use]
    pub fn current() -> Self {
        match Handle::try_current() {
            Ok(handle) => Dispatch::Tokio(handle),
            Err(_) => Dispatch::Thread,
        }
    }
}

/// Configuration for an [`AsyncClient`](crate::AsyncClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Worker used to run executor calls.
    pub dispatch: Dispatch,
    /// Name given to worker threads when dispatching to threads.
    pub thread_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            dispatch: Dispatch::Thread,
            thread_name: "arbor-worker".to_string(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dispatch target.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Dispatches to the blocking pool of the given runtime.
    #[must_use]
    pub fn with_tokio(self, handle: Handle) -> Self {
        self.with_dispatch(Dispatch::Tokio(handle))
    }

    /// Sets the worker thread name.
    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
