//! Asynchronous existence check.

use crate::bridge::CompletionBridge;
use crate::compile::ExistsConfig;
use crate::error::{ArborError, ArborResult};
use crate::executor::{OperationExecutor, OperationResult};
use crate::handle::AsyncHandle;
use arbor_proto::{CreateOptions, OperationKind, Stat};
use std::sync::Arc;

/// Builder for an asynchronous existence check. Resolves to the node's
/// metadata, or `None` if the node is absent.
#[must_use = "builders do nothing until for_path is called"]
pub struct AsyncExistsBuilder<E> {
    executor: Arc<E>,
    bridge: CompletionBridge,
    config: ExistsConfig,
}

impl<E: OperationExecutor + 'static> AsyncExistsBuilder<E> {
    pub(crate) fn new(executor: Arc<E>, bridge: CompletionBridge) -> Self {
        Self {
            executor,
            bridge,
            config: ExistsConfig::default(),
        }
    }

    /// Sets the options. Only the parent-creation options have an effect.
    pub fn with_options(mut self, options: CreateOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Returns the accumulated configuration.
    pub fn config(&self) -> &ExistsConfig {
        &self.config
    }

    /// Checks whether `path` exists.
    pub fn for_path(self, path: &str) -> ArborResult<AsyncHandle<Option<Stat>>> {
        let operation = self.config.compile(path)?;
        tracing::debug!(path, "submitting exists");

        let executor = self.executor;
        Ok(self.bridge.call("exists", move || {
            match executor.execute(&operation)? {
                OperationResult::Exists { stat } => Ok(stat),
                other => Err(ArborError::unexpected_result(OperationKind::Exists, &other)),
            }
        }))
    }
}
