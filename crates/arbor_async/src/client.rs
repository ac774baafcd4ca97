//! The asynchronous client.

use crate::bridge::CompletionBridge;
use crate::config::ClientConfig;
use crate::create::AsyncCreateBuilder;
use crate::delete::AsyncDeleteBuilder;
use crate::error::{ArborError, ArborResult};
use crate::executor::OperationExecutor;
use crate::exists::AsyncExistsBuilder;
use crate::handle::AsyncHandle;
use crate::listener::{LoggingListener, UnhandledErrorListener};
use crate::set_data::AsyncSetDataBuilder;
use crate::transaction_op::TransactionOp;
use arbor_proto::{TransactionResult, TransactionUnit};
use std::fmt;
use std::sync::Arc;

/// Asynchronous façade over a synchronous [`OperationExecutor`].
///
/// Every method returns a fresh builder; builders are single-use and the
/// client itself holds no per-operation state, so it can be cloned and
/// shared freely.
pub struct AsyncClient<E> {
    executor: Arc<E>,
    bridge: CompletionBridge,
}

impl<E: OperationExecutor + 'static> AsyncClient<E> {
    /// Wraps `executor` with the default configuration.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, ClientConfig::default())
    }

    /// Wraps `executor` with `config`.
    pub fn with_config(executor: E, config: ClientConfig) -> Self {
        Self::from_shared(Arc::new(executor), config)
    }

    /// Wraps an executor that is shared with other owners.
    pub fn from_shared(executor: Arc<E>, config: ClientConfig) -> Self {
        tracing::debug!(thread_name = %config.thread_name, "creating async client");
        Self {
            executor,
            bridge: CompletionBridge::new(&config, Arc::new(LoggingListener)),
        }
    }

    /// Routes unhandled failures to `listener` instead of the log.
    #[must_use]
    pub fn with_unhandled_error_listener(
        mut self,
        listener: Arc<dyn UnhandledErrorListener>,
    ) -> Self {
        self.bridge = self.bridge.with_listener(listener);
        self
    }

    /// Returns the wrapped executor.
    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }

    /// Starts a create.
    pub fn create(&self) -> AsyncCreateBuilder<E> {
        AsyncCreateBuilder::new(Arc::clone(&self.executor), self.bridge.clone())
    }

    /// Starts a delete.
    pub fn delete(&self) -> AsyncDeleteBuilder<E> {
        AsyncDeleteBuilder::new(Arc::clone(&self.executor), self.bridge.clone())
    }

    /// Starts a set-data.
    pub fn set_data(&self) -> AsyncSetDataBuilder<E> {
        AsyncSetDataBuilder::new(Arc::clone(&self.executor), self.bridge.clone())
    }

    /// Starts an existence check.
    pub fn check_exists(&self) -> AsyncExistsBuilder<E> {
        AsyncExistsBuilder::new(Arc::clone(&self.executor), self.bridge.clone())
    }

    /// Returns the transaction operation builders.
    pub fn transaction_op(&self) -> TransactionOp<E> {
        TransactionOp::new(Arc::clone(&self.executor))
    }

    /// Commits `units` atomically.
    ///
    /// Resolves to one result per unit, in order.
    pub fn transaction(
        &self,
        units: Vec<TransactionUnit>,
    ) -> ArborResult<AsyncHandle<Vec<TransactionResult>>> {
        if units.is_empty() {
            return Err(ArborError::invalid_argument(
                "operations",
                "a transaction needs at least one operation",
            ));
        }
        tracing::debug!(units = units.len(), "submitting transaction");

        let executor = Arc::clone(&self.executor);
        Ok(self.bridge.call("transaction", move || {
            let results = executor.commit(&units)?;
            if results.len() != units.len() {
                return Err(ArborError::ResultCountMismatch {
                    units: units.len(),
                    results: results.len(),
                });
            }
            Ok(results)
        }))
    }
}

impl<E> Clone for AsyncClient<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            bridge: self.bridge.clone(),
        }
    }
}

impl<E> fmt::Debug for AsyncClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncClient")
            .field("bridge", &self.bridge)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{MockExecutor, OperationResult};
    use crate::listener::RecordingListener;
    use arbor_proto::{OperationDescriptor, Version};
    use std::time::Duration;

    /// Commits every unit but reports one result fewer.
    #[derive(Default)]
    struct ShortCommit(MockExecutor);

    impl OperationExecutor for ShortCommit {
        fn execute(&self, operation: &OperationDescriptor) -> ArborResult<OperationResult> {
            self.0.execute(operation)
        }

        fn commit(&self, units: &[TransactionUnit]) -> ArborResult<Vec<TransactionResult>> {
            let mut results = self.0.commit(units)?;
            results.pop();
            Ok(results)
        }
    }

    #[test]
    fn empty_transaction_is_rejected() {
        let client = AsyncClient::new(MockExecutor::new());
        let err = client.transaction(Vec::new()).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(client.executor().committed().is_empty());
    }

    #[test]
    fn clones_share_the_executor() {
        let client = AsyncClient::new(MockExecutor::new());
        let other = client.clone();
        other.delete().for_path("/a").unwrap().get().unwrap();
        assert_eq!(client.executor().execution_count(), 1);
    }

    #[test]
    fn short_commit_is_an_invariant_violation() {
        let listener = Arc::new(RecordingListener::new());
        let client = AsyncClient::new(ShortCommit::default())
            .with_unhandled_error_listener(listener.clone());
        let units = vec![
            TransactionUnit::Check {
                path: "/a".into(),
                version: Version::ANY,
            },
            TransactionUnit::Check {
                path: "/b".into(),
                version: Version::ANY,
            },
        ];

        let err = client.transaction(units).unwrap().get().unwrap_err();
        assert_eq!(
            err,
            ArborError::ResultCountMismatch {
                units: 2,
                results: 1
            }
        );
        assert!(err.is_internal());
        assert!(listener.wait_for(1, Duration::from_secs(5)));
        assert_eq!(listener.errors(), vec![err]);
    }
}
