//! Transaction operation builders.
//!
//! These builders never submit anything. Their terminal calls compile the
//! accumulated configuration into an inert [`TransactionUnit`], which the
//! caller collects into a list and commits later with
//! [`AsyncClient::transaction`](crate::AsyncClient::transaction).
//!
//! Compilation goes through the executor's
//! [`compile_transaction_unit`](OperationExecutor::compile_transaction_unit).
//! The configuration has already been validated when that call happens, so
//! an executor failure there is an invariant violation: it is logged and
//! escalated as a panic instead of being returned.

use crate::compile::{SetDataConfig, TxnCreateConfig, TxnTemplate};
use crate::error::{ArborError, ArborResult};
use crate::executor::OperationExecutor;
use arbor_proto::{AclList, CreateMode, OperationDescriptor, TransactionUnit, Version};
use bytes::Bytes;
use std::sync::Arc;

/// Entry point for the four transaction operation builders.
pub struct TransactionOp<E> {
    executor: Arc<E>,
}

impl<E: OperationExecutor> TransactionOp<E> {
    pub(crate) fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }

    /// Starts a create unit.
    pub fn create(&self) -> TransactionCreateBuilder<E> {
        TransactionCreateBuilder {
            executor: Arc::clone(&self.executor),
            config: TxnCreateConfig::default(),
        }
    }

    /// Starts a delete unit.
    pub fn delete(&self) -> TransactionDeleteBuilder<E> {
        TransactionDeleteBuilder {
            executor: Arc::clone(&self.executor),
            version: Version::ANY,
        }
    }

    /// Starts a set-data unit.
    pub fn set_data(&self) -> TransactionSetDataBuilder<E> {
        TransactionSetDataBuilder {
            executor: Arc::clone(&self.executor),
            config: SetDataConfig::default(),
        }
    }

    /// Starts a check unit.
    pub fn check(&self) -> TransactionCheckBuilder<E> {
        TransactionCheckBuilder {
            executor: Arc::clone(&self.executor),
            version: Version::ANY,
        }
    }
}

impl<E> Clone for TransactionOp<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}

fn compile_unit<E: OperationExecutor>(
    executor: &E,
    template: &TxnTemplate,
    path: &str,
    payload: Option<Bytes>,
) -> ArborResult<TransactionUnit> {
    let operation = template.compile(path, payload)?;
    match executor.compile_transaction_unit(&operation) {
        Ok(unit) => Ok(unit),
        Err(cause) => fatal_compilation_failure(&operation, &cause),
    }
}

fn fatal_compilation_failure(operation: &OperationDescriptor, cause: &ArborError) -> ! {
    let error = ArborError::FatalCompilation {
        path: operation.path().to_string(),
        reason: cause.to_string(),
    };
    tracing::error!(
        path = operation.path(),
        kind = %operation.kind(),
        error = %cause,
        "transaction unit compilation failed"
    );
    panic!("{error}");
}

/// Builder for a transactional create.
#[must_use = "builders do nothing until a for_path call"]
pub struct TransactionCreateBuilder<E> {
    executor: Arc<E>,
    config: TxnCreateConfig,
}

impl<E: OperationExecutor> TransactionCreateBuilder<E> {
    /// Sets the creation mode.
    pub fn with_mode(mut self, mode: CreateMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Sets the ACL; `None` restores the service default.
    pub fn with_acl(mut self, acl: impl Into<Option<AclList>>) -> Self {
        self.config.acl = acl.into();
        self
    }

    /// Compresses the data before sending.
    pub fn compressed(mut self) -> Self {
        self.config.compressed = true;
        self
    }

    /// Sets mode, ACL and compression at once.
    pub fn with_options(
        mut self,
        mode: CreateMode,
        acl: impl Into<Option<AclList>>,
        compressed: bool,
    ) -> Self {
        self.config = TxnCreateConfig {
            mode,
            acl: acl.into(),
            compressed,
        };
        self
    }

    /// Returns the accumulated configuration.
    pub fn config(&self) -> &TxnCreateConfig {
        &self.config
    }

    /// Compiles a create unit for `path` with no data.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::InvalidArgument`] if `path` is empty, or
    /// [`ArborError::Proto`] if it breaks the path grammar.
    ///
    /// # Panics
    ///
    /// Panics if the executor fails to compile the unit.
    pub fn for_path(self, path: &str) -> ArborResult<TransactionUnit> {
        compile_unit(self.executor.as_ref(), &TxnTemplate::Create(self.config), path, None)
    }

    /// Compiles a create unit for `path` holding `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::InvalidArgument`] if `path` is empty, or
    /// [`ArborError::Proto`] if it breaks the path grammar.
    ///
    /// # Panics
    ///
    /// Panics if the executor fails to compile the unit.
    pub fn for_path_with_data(
        self,
        path: &str,
        data: impl Into<Bytes>,
    ) -> ArborResult<TransactionUnit> {
        compile_unit(
            self.executor.as_ref(),
            &TxnTemplate::Create(self.config),
            path,
            Some(data.into()),
        )
    }
}

/// Builder for a transactional delete.
#[must_use = "builders do nothing until for_path is called"]
pub struct TransactionDeleteBuilder<E> {
    executor: Arc<E>,
    version: Version,
}

impl<E: OperationExecutor> TransactionDeleteBuilder<E> {
    /// Only deletes if the node is at `version`.
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.version = version.into();
        self
    }

    /// Compiles a delete unit for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::InvalidArgument`] if `path` is empty, or
    /// [`ArborError::Proto`] if it breaks the path grammar.
    ///
    /// # Panics
    ///
    /// Panics if the executor fails to compile the unit.
    pub fn for_path(self, path: &str) -> ArborResult<TransactionUnit> {
        let template = TxnTemplate::Delete {
            version: self.version,
        };
        compile_unit(self.executor.as_ref(), &template, path, None)
    }
}

/// Builder for a transactional set-data.
#[must_use = "builders do nothing until for_path is called"]
pub struct TransactionSetDataBuilder<E> {
    executor: Arc<E>,
    config: SetDataConfig,
}

impl<E: OperationExecutor> TransactionSetDataBuilder<E> {
    /// Only writes if the node is at `version`.
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Compresses the data before sending.
    pub fn compressed(mut self) -> Self {
        self.config.compressed = true;
        self
    }

    /// Compresses the data and sets the version guard.
    pub fn with_version_compressed(self, version: impl Into<Version>) -> Self {
        self.compressed().with_version(version)
    }

    /// Compiles a set-data unit writing `data` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::InvalidArgument`] if `path` is empty, or
    /// [`ArborError::Proto`] if it breaks the path grammar.
    ///
    /// # Panics
    ///
    /// Panics if the executor fails to compile the unit.
    pub fn for_path(self, path: &str, data: impl Into<Bytes>) -> ArborResult<TransactionUnit> {
        compile_unit(
            self.executor.as_ref(),
            &TxnTemplate::SetData(self.config),
            path,
            Some(data.into()),
        )
    }
}

/// Builder for a transactional version check.
#[must_use = "builders do nothing until for_path is called"]
pub struct TransactionCheckBuilder<E> {
    executor: Arc<E>,
    version: Version,
}

impl<E: OperationExecutor> TransactionCheckBuilder<E> {
    /// Requires the node to be at `version`.
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.version = version.into();
        self
    }

    /// Compiles a check unit for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::InvalidArgument`] if `path` is empty, or
    /// [`ArborError::Proto`] if it breaks the path grammar.
    ///
    /// # Panics
    ///
    /// Panics if the executor fails to compile the unit.
    pub fn for_path(self, path: &str) -> ArborResult<TransactionUnit> {
        let template = TxnTemplate::Check {
            version: self.version,
        };
        compile_unit(self.executor.as_ref(), &template, path, None)
    }
}
