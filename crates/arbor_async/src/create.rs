//! Asynchronous create builder.

use crate::bridge::CompletionBridge;
use crate::compile::CreateConfig;
use crate::error::{ArborError, ArborResult};
use crate::executor::{OperationExecutor, OperationResult};
use crate::handle::AsyncHandle;
use arbor_proto::{AclList, CreateMode, CreateOptions, OperationKind, StatSlot};
use bytes::Bytes;
use std::sync::Arc;

/// Fluent builder for an asynchronous create.
///
/// Setters replace the corresponding fields and may be chained in any order;
/// the last call wins. The terminal `for_path*` calls consume the builder,
/// submit the operation and return a handle that resolves to the path of the
/// created node (which differs from the requested path for sequential
/// modes).
///
/// ```ignore
/// let handle = client
///     .create()
///     .with_mode(CreateMode::EphemeralSequential)
///     .with_options(CreateOption::CreateParentsIfNeeded.into())
///     .for_path_with_data("/workers/worker-", "host-1")?;
/// let actual_path = handle.await?;
/// ```
#[must_use = "builders do nothing until a for_path call"]
pub struct AsyncCreateBuilder<E> {
    executor: Arc<E>,
    bridge: CompletionBridge,
    config: CreateConfig,
}

impl<E: OperationExecutor + 'static> AsyncCreateBuilder<E> {
    pub(crate) fn new(executor: Arc<E>, bridge: CompletionBridge) -> Self {
        Self {
            executor,
            bridge,
            config: CreateConfig::default(),
        }
    }

    /// Stores the created node's metadata in `stat`.
    pub fn storing_stat_in(mut self, stat: StatSlot) -> Self {
        self.config.stat = Some(stat);
        self
    }

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

    /// Sets the create options.
    pub fn with_options(mut self, options: CreateOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Sets the options and ACL. The mode is left unchanged.
    pub fn with_options_and_acl(
        mut self,
        options: CreateOptions,
        acl: impl Into<Option<AclList>>,
    ) -> Self {
        self.config.options = options;
        self.config.acl = acl.into();
        self
    }

    /// Sets the options and mode.
    pub fn with_options_and_mode(mut self, options: CreateOptions, mode: CreateMode) -> Self {
        self.config.options = options;
        self.config.mode = mode;
        self
    }

    /// Sets the options, mode and ACL.
    pub fn with_options_mode_and_acl(
        mut self,
        options: CreateOptions,
        mode: CreateMode,
        acl: impl Into<Option<AclList>>,
    ) -> Self {
        self.config.options = options;
        self.config.mode = mode;
        self.config.acl = acl.into();
        self
    }

    /// Replaces the whole configuration.
    pub fn with_options_mode_acl_and_stat(
        mut self,
        options: CreateOptions,
        mode: CreateMode,
        acl: impl Into<Option<AclList>>,
        stat: impl Into<Option<StatSlot>>,
    ) -> Self {
        self.config = CreateConfig {
            mode,
            acl: acl.into(),
            options,
            stat: stat.into(),
        };
        self
    }

    /// Returns the accumulated configuration.
    pub fn config(&self) -> &CreateConfig {
        &self.config
    }

    /// Creates a node at `path` with no data.
    ///
    /// The service stores its default payload for nodes created without
    /// data.
    pub fn for_path(self, path: &str) -> ArborResult<AsyncHandle<String>> {
        self.submit(path, None)
    }

    /// Creates a node at `path` holding `data`.
    pub fn for_path_with_data(
        self,
        path: &str,
        data: impl Into<Bytes>,
    ) -> ArborResult<AsyncHandle<String>> {
        self.submit(path, Some(data.into()))
    }

    fn submit(self, path: &str, payload: Option<Bytes>) -> ArborResult<AsyncHandle<String>> {
        let operation = self.config.compile(path, payload)?;
        tracing::debug!(path, mode = %self.config.mode, "submitting create");

        let executor = self.executor;
        Ok(self.bridge.call("create", move || {
            match executor.execute(&operation)? {
                OperationResult::Created { path } => Ok(path),
                other => Err(ArborError::unexpected_result(OperationKind::Create, &other)),
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
    use arbor_proto::CreateOption;

    fn builder() -> (Arc<MockExecutor>, AsyncCreateBuilder<MockExecutor>) {
        let mock = Arc::new(MockExecutor::new());
        let bridge = CompletionBridge::new(&ClientConfig::default(), Arc::new(LoggingListener));
        (Arc::clone(&mock), AsyncCreateBuilder::new(mock, bridge))
    }

    #[test]
    fn defaults() {
        let (_, builder) = builder();
        assert_eq!(builder.config(), &CreateConfig::default());
        assert_eq!(builder.config().mode, CreateMode::Persistent);
    }

    #[test]
    fn last_setter_wins() {
        let (_, builder) = builder();
        let builder = builder
            .with_mode(CreateMode::Ephemeral)
            .with_acl(AclList::read_unsafe())
            .with_options_and_mode(CreateOptions::empty(), CreateMode::Container);
        assert_eq!(builder.config().mode, CreateMode::Container);
        assert_eq!(builder.config().acl, Some(AclList::read_unsafe()));
    }

    #[test]
    fn options_and_acl_keep_mode() {
        let (_, builder) = builder();
        let options = CreateOptions::from(CreateOption::DoProtected);
        let builder = builder
            .with_mode(CreateMode::EphemeralSequential)
            .with_options_and_acl(options, None);
        assert_eq!(builder.config().mode, CreateMode::EphemeralSequential);
        assert_eq!(builder.config().options, options);
        assert_eq!(builder.config().acl, None);
    }

    #[test]
    fn full_setter_may_clear_stat() {
        let (_, builder) = builder();
        let builder = builder.storing_stat_in(StatSlot::new()).with_options_mode_acl_and_stat(
            CreateOptions::empty(),
            CreateMode::Persistent,
            None,
            None,
        );
        assert_eq!(builder.config().stat, None);
    }

    #[test]
    fn submits_descriptor() {
        let (mock, builder) = builder();
        let handle = builder
            .with_mode(CreateMode::PersistentSequential)
            .for_path_with_data("/jobs/job-", "payload")
            .unwrap();
        assert_eq!(handle.get(), Ok("/jobs/job-0000000000".to_string()));

        let executed = mock.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].mode(), Some(CreateMode::PersistentSequential));
        assert_eq!(
            executed[0].payload().map(|p| p.as_ref()),
            Some(&b"payload"[..])
        );
    }

    #[test]
    fn empty_path_fails_before_submission() {
        let (mock, builder) = builder();
        let err = builder.for_path("").unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(mock.execution_count(), 0);
    }
}
