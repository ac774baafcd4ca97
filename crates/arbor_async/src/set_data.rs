//! Asynchronous set-data builder.

use crate::bridge::CompletionBridge;
use crate::compile::SetDataConfig;
use crate::error::{ArborError, ArborResult};
use crate::executor::{OperationExecutor, OperationResult};
use crate::handle::AsyncHandle;
use arbor_proto::{OperationKind, Stat, Version};
use bytes::Bytes;
use std::sync::Arc;

/// Fluent builder for an asynchronous set-data. Resolves to the node's
/// metadata after the write.
#[must_use = "builders do nothing until a for_path call"]
pub struct AsyncSetDataBuilder<E> {
    executor: Arc<E>,
    bridge: CompletionBridge,
    config: SetDataConfig,
}

impl<E: OperationExecutor + 'static> AsyncSetDataBuilder<E> {
    pub(crate) fn new(executor: Arc<E>, bridge: CompletionBridge) -> Self {
        Self {
            executor,
            bridge,
            config: SetDataConfig::default(),
        }
    }

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

    /// Returns the accumulated configuration.
    pub fn config(&self) -> &SetDataConfig {
        &self.config
    }

    /// Writes the service default payload to `path`.
    pub fn for_path(self, path: &str) -> ArborResult<AsyncHandle<Stat>> {
        self.submit(path, None)
    }

    /// Writes `data` to `path`.
    pub fn for_path_with_data(
        self,
        path: &str,
        data: impl Into<Bytes>,
    ) -> ArborResult<AsyncHandle<Stat>> {
        self.submit(path, Some(data.into()))
    }

    fn submit(self, path: &str, payload: Option<Bytes>) -> ArborResult<AsyncHandle<Stat>> {
        let operation = self.config.compile(path, payload)?;
        tracing::debug!(path, version = %self.config.version, "submitting setData");

        let executor = self.executor;
        Ok(self.bridge.call("setData", move || {
            match executor.execute(&operation)? {
                OperationResult::DataSet { stat } => Ok(stat),
                other => Err(ArborError::unexpected_result(OperationKind::SetData, &other)),
            }
        }))
    }
}
