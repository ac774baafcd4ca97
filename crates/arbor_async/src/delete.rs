//! Asynchronous delete builder.

use crate::bridge::CompletionBridge;
use crate::compile::DeleteConfig;
use crate::error::{ArborError, ArborResult};
use crate::executor::{OperationExecutor, OperationResult};
use crate::handle::AsyncHandle;
use arbor_proto::{DeleteOptions, OperationKind, Version};
use std::sync::Arc;

/// Fluent builder for an asynchronous delete.
#[must_use = "builders do nothing until for_path is called"]
pub struct AsyncDeleteBuilder<E> {
    executor: Arc<E>,
    bridge: CompletionBridge,
    config: DeleteConfig,
}

impl<E: OperationExecutor + 'static> AsyncDeleteBuilder<E> {
    pub(crate) fn new(executor: Arc<E>, bridge: CompletionBridge) -> Self {
        Self {
            executor,
            bridge,
            config: DeleteConfig::default(),
        }
    }

    /// Only deletes if the node is at `version`.
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.config.version = version.into();
        self
    }

    /// Sets the delete options.
    pub fn with_options(mut self, options: DeleteOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Sets the options and version.
    pub fn with_options_and_version(
        mut self,
        options: DeleteOptions,
        version: impl Into<Version>,
    ) -> Self {
        self.config.options = options;
        self.config.version = version.into();
        self
    }

    /// Returns the accumulated configuration.
    pub fn config(&self) -> &DeleteConfig {
        &self.config
    }

    /// Deletes the node at `path`.
    pub fn for_path(self, path: &str) -> ArborResult<AsyncHandle<()>> {
        let operation = self.config.compile(path)?;
        tracing::debug!(path, version = %self.config.version, "submitting delete");

        let executor = self.executor;
        Ok(self.bridge.call("delete", move || {
            match executor.execute(&operation)? {
                OperationResult::Deleted => Ok(()),
                other => Err(ArborError::unexpected_result(OperationKind::Delete, &other)),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::executor::MockExecutor;
    use crate::listener::LoggingListener;
    use arbor_proto::DeleteOption;

    #[test]
    fn submits_version_and_options() {
        let mock = Arc::new(MockExecutor::new());
        let bridge = CompletionBridge::new(&ClientConfig::default(), Arc::new(LoggingListener));
        let options: DeleteOptions = [DeleteOption::Guaranteed, DeleteOption::Quietly]
            .into_iter()
            .collect();

        let builder = AsyncDeleteBuilder::new(Arc::clone(&mock), bridge)
            .with_version(2)
            .with_options(options);
        assert_eq!(builder.config().version, Version::new(2));

        builder.for_path("/locks/a").unwrap().get().unwrap();
        let executed = mock.executed();
        assert_eq!(executed[0].version(), Some(Version::new(2)));
        assert_eq!(executed[0].delete_options(), Some(options));
    }
}
