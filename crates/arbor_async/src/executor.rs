//! The executor seam.
//!
//! An [`OperationExecutor`] performs operations against the coordination
//! service synchronously. The façade never talks to the service itself: it
//! builds descriptors, hands them to the executor on a worker, and adapts
//! the outcome. Implementations are expected to be internally synchronized.

use crate::error::{ArborError, ArborResult};
use arbor_proto::{
    OperationDescriptor, OperationParams, Stat, TransactionResult, TransactionUnit,
    Version,
};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// Outcome of a successfully executed single operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// A node was created at the given (possibly sequential) path.
    Created {
        /// Actual path of the new node.
        path: String,
    },
    /// A node was deleted.
    Deleted,
    /// A node's data was replaced.
    DataSet {
        /// Metadata after the write.
        stat: Stat,
    },
    /// Existence check; `None` if the node is absent.
    Exists {
        /// Metadata of the node, if present.
        stat: Option<Stat>,
    },
}

impl OperationResult {
    /// Short name of the result shape, for diagnostics.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            OperationResult::Created { .. } => "created",
            OperationResult::Deleted => "deleted",
            OperationResult::DataSet { .. } => "data set",
            OperationResult::Exists { .. } => "exists",
        }
    }
}

/// Synchronous executor for coordination-service operations.
pub trait OperationExecutor: Send + Sync {
    /// Executes one operation, blocking until the service answers.
    ///
    /// Service rejections are returned as [`ArborError::Operation`].
    fn execute(&self, operation: &OperationDescriptor) -> ArborResult<OperationResult>;

    /// Compiles a descriptor into an inert transaction unit.
    ///
    /// Must not contact the service. The default validates the path and
    /// converts the descriptor.
    fn compile_transaction_unit(
        &self,
        operation: &OperationDescriptor,
    ) -> ArborResult<TransactionUnit> {
        Ok(TransactionUnit::compile(operation)?)
    }

    /// Applies all units atomically, returning one result per unit.
    fn commit(&self, units: &[TransactionUnit]) -> ArborResult<Vec<TransactionResult>>;
}

/// In-memory executor for tests.
///
/// Records every call, answers with plausible results and can be told to
/// fail, panic, slow down or hold calls until released.
#[derive(Debug, Default)]
pub struct MockExecutor {
    executed: Mutex<Vec<OperationDescriptor>>,
    compiled: Mutex<Vec<OperationDescriptor>>,
    committed: Mutex<Vec<Vec<TransactionUnit>>>,
    failure: Mutex<Option<ArborError>>,
    compile_failure: Mutex<Option<ArborError>>,
    response: Mutex<Option<OperationResult>>,
    panic_message: Mutex<Option<String>>,
    delay: Mutex<Duration>,
    held: Mutex<bool>,
    released: Condvar,
    sequence: AtomicU64,
}

impl MockExecutor {
    /// Creates a mock that succeeds at everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `execute` and `commit` fail with `error` (or succeed with `None`).
    pub fn set_failure(&self, error: Option<ArborError>) {
        *self.failure.lock() = error;
    }

    /// Makes `compile_transaction_unit` fail with `error`.
    pub fn set_compile_failure(&self, error: Option<ArborError>) {
        *self.compile_failure.lock() = error;
    }

    /// Makes `execute` return `result` regardless of the operation.
    pub fn set_response(&self, result: Option<OperationResult>) {
        *self.response.lock() = result;
    }

    /// Makes `execute` panic with `message`.
    pub fn set_panic(&self, message: Option<String>) {
        *self.panic_message.lock() = message;
    }

    /// Sleeps for `delay` inside every `execute` call.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    /// Blocks subsequent `execute` and `commit` calls until [`release`](Self::release).
    pub fn hold(&self) {
        *self.held.lock() = true;
    }

    /// Unblocks held calls.
    pub fn release(&self) {
        *self.held.lock() = false;
        self.released.notify_all();
    }

    /// Returns the descriptors passed to `execute`, in call order.
    pub fn executed(&self) -> Vec<OperationDescriptor> {
        self.executed.lock().clone()
    }

    /// Returns the descriptors passed to `compile_transaction_unit`.
    pub fn compiled(&self) -> Vec<OperationDescriptor> {
        self.compiled.lock().clone()
    }

    /// Returns every committed unit list.
    pub fn committed(&self) -> Vec<Vec<TransactionUnit>> {
        self.committed.lock().clone()
    }

    /// Returns the number of `execute` calls.
    pub fn execution_count(&self) -> usize {
        self.executed.lock().len()
    }

    fn wait_until_released(&self) {
        let mut held = self.held.lock();
        while *held {
            self.released.wait(&mut held);
        }
    }

    fn sequential_path(&self, path: &str) -> String {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst);
        format!("{path}{n:010}")
    }

    fn stat_for(&self, data_length: usize, version: Version) -> Stat {
        let zxid = self.sequence.load(Ordering::SeqCst) as i64;
        Stat {
            czxid: zxid,
            mzxid: zxid,
            version: if version.is_any() { 1 } else { version.as_i32() + 1 },
            data_length: i32::try_from(data_length).unwrap_or(i32::MAX),
            ..Stat::default()
        }
    }
}

impl OperationExecutor for MockExecutor {
    fn execute(&self, operation: &OperationDescriptor) -> ArborResult<OperationResult> {
        self.executed.lock().push(operation.clone());
        self.wait_until_released();

        let delay = *self.delay.lock();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        let panic_message = self.panic_message.lock().clone();
        if let Some(message) = panic_message {
            panic!("{message}");
        }
        let failure = self.failure.lock().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        let response = self.response.lock().clone();
        if let Some(result) = response {
            return Ok(result);
        }

        let data_length = operation.payload().map_or(0, |p| p.len());
        match operation.params() {
            OperationParams::Create { mode, stat, .. } => {
                let path = if mode.is_sequential() {
                    self.sequential_path(operation.path())
                } else {
                    operation.path().to_string()
                };
                if let Some(slot) = stat {
                    slot.set(Stat {
                        version: 0,
                        ..self.stat_for(data_length, Version::ANY)
                    });
                }
                Ok(OperationResult::Created { path })
            }
            OperationParams::Delete { .. } => Ok(OperationResult::Deleted),
            OperationParams::SetData { version, .. } => Ok(OperationResult::DataSet {
                stat: self.stat_for(data_length, *version),
            }),
            OperationParams::Exists { .. } => Ok(OperationResult::Exists {
                stat: Some(self.stat_for(0, Version::ANY)),
            }),
            OperationParams::Check { .. } => Err(ArborError::invalid_argument(
                "operation",
                "check can only run inside a transaction",
            )),
        }
    }

    fn compile_transaction_unit(
        &self,
        operation: &OperationDescriptor,
    ) -> ArborResult<TransactionUnit> {
        self.compiled.lock().push(operation.clone());
        let failure = self.compile_failure.lock().clone();
        if let Some(error) = failure {
            return Err(error);
        }
        Ok(TransactionUnit::compile(operation)?)
    }

    fn commit(&self, units: &[TransactionUnit]) -> ArborResult<Vec<TransactionResult>> {
        self.committed.lock().push(units.to_vec());
        self.wait_until_released();

        let failure = self.failure.lock().clone();
        if let Some(error) = failure {
            return Err(error);
        }

        let results = units
            .iter()
            .map(|unit| {
                let result = TransactionResult::success(unit);
                match unit {
                    TransactionUnit::Create { path, mode, .. } if mode.is_sequential() => {
                        result.with_result_path(self.sequential_path(path))
                    }
                    TransactionUnit::Create { path, .. } => result.with_result_path(path.clone()),
                    TransactionUnit::SetData { data, version, .. } => result.with_stat(
                        self.stat_for(data.as_ref().map_or(0, Vec::len), *version),
                    ),
                    TransactionUnit::Delete { .. } | TransactionUnit::Check { .. } => result,
                }
            })
            .collect();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_proto::{CreateMode, CreateOptions, DeleteOptions, ErrorCode, StatSlot};
    use bytes::Bytes;

    fn create(path: &str, mode: CreateMode, stat: Option<StatSlot>) -> OperationDescriptor {
        OperationDescriptor::new(
            path,
            Some(Bytes::from_static(b"data")),
            OperationParams::Create {
                mode,
                acl: None,
                options: CreateOptions::empty(),
                stat,
            },
        )
    }

    #[test]
    fn records_and_answers_creates() {
        let mock = MockExecutor::new();
        let slot = StatSlot::new();
        let result = mock
            .execute(&create("/a", CreateMode::Persistent, Some(slot.clone())))
            .unwrap();
        assert_eq!(result, OperationResult::Created { path: "/a".into() });
        assert_eq!(slot.get().map(|s| s.data_length), Some(4));
        assert_eq!(mock.execution_count(), 1);
        assert_eq!(mock.executed()[0].path(), "/a");
    }

    #[test]
    fn sequential_creates_get_suffixes() {
        let mock = MockExecutor::new();
        let first = mock
            .execute(&create("/q/item-", CreateMode::PersistentSequential, None))
            .unwrap();
        let second = mock
            .execute(&create("/q/item-", CreateMode::EphemeralSequential, None))
            .unwrap();
        assert_eq!(
            first,
            OperationResult::Created {
                path: "/q/item-0000000000".into()
            }
        );
        assert_eq!(
            second,
            OperationResult::Created {
                path: "/q/item-0000000001".into()
            }
        );
    }

    #[test]
    fn injected_failure() {
        let mock = MockExecutor::new();
        mock.set_failure(Some(ArborError::operation(ErrorCode::NoNode, "/a")));
        let op = OperationDescriptor::new(
            "/a",
            None,
            OperationParams::Delete {
                version: Version::ANY,
                options: DeleteOptions::empty(),
            },
        );
        assert_eq!(
            mock.execute(&op).unwrap_err().code(),
            Some(ErrorCode::NoNode)
        );
        assert!(mock.commit(&[]).is_err());

        mock.set_failure(None);
        assert_eq!(mock.execute(&op).unwrap(), OperationResult::Deleted);
    }

    #[test]
    fn check_is_transaction_only() {
        let mock = MockExecutor::new();
        let op = OperationDescriptor::new(
            "/a",
            None,
            OperationParams::Check {
                version: Version::new(1),
            },
        );
        assert!(mock.execute(&op).unwrap_err().is_invalid_argument());
        assert!(mock.compile_transaction_unit(&op).is_ok());
    }

    #[test]
    fn commit_reports_created_paths() {
        let mock = MockExecutor::new();
        let units = vec![
            mock.compile_transaction_unit(&create("/a", CreateMode::Persistent, None))
                .unwrap(),
            TransactionUnit::Check {
                path: "/b".into(),
                version: Version::new(3),
            },
        ];
        let results = mock.commit(&units).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].result_path.as_deref(), Some("/a"));
        assert!(results.iter().all(TransactionResult::is_success));
        assert_eq!(mock.committed(), vec![units]);
    }
}
