//! Builder configuration records.
//!
//! Each builder accumulates one of these records and, at its terminal call,
//! compiles it with a path and payload into an [`OperationDescriptor`].
//! Compilation is pure; it never contacts the executor.

use crate::error::{ArborError, ArborResult};
use arbor_proto::{
    validate_path, validate_sequential_path, AclList, CreateMode, CreateOption, CreateOptions,
    DeleteOptions, OperationDescriptor, OperationParams, StatSlot, Version,
};
use bytes::Bytes;

/// Rejects an empty path.
pub(crate) fn require_path(path: &str) -> ArborResult<()> {
    if path.is_empty() {
        return Err(ArborError::invalid_argument("path", "path cannot be empty"));
    }
    Ok(())
}

/// Accumulated configuration of an asynchronous create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateConfig {
    /// Creation mode.
    pub mode: CreateMode,
    /// ACL, or `None` for the service default.
    pub acl: Option<AclList>,
    /// Create options.
    pub options: CreateOptions,
    /// Slot to receive the new node's metadata.
    pub stat: Option<StatSlot>,
}

impl CreateConfig {
    /// Compiles a create descriptor.
    pub fn compile(&self, path: &str, payload: Option<Bytes>) -> ArborResult<OperationDescriptor> {
        require_path(path)?;
        Ok(OperationDescriptor::new(
            path,
            payload,
            OperationParams::Create {
                mode: self.mode,
                acl: self.acl.clone(),
                options: self.options,
                stat: self.stat.clone(),
            },
        ))
    }
}

/// Accumulated configuration of an asynchronous delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteConfig {
    /// Version guard.
    pub version: Version,
    /// Delete options.
    pub options: DeleteOptions,
}

impl DeleteConfig {
    /// Compiles a delete descriptor.
    pub fn compile(&self, path: &str) -> ArborResult<OperationDescriptor> {
        require_path(path)?;
        Ok(OperationDescriptor::new(
            path,
            None,
            OperationParams::Delete {
                version: self.version,
                options: self.options,
            },
        ))
    }
}

/// Accumulated configuration of a set-data, asynchronous or transactional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetDataConfig {
    /// Version guard.
    pub version: Version,
    /// Whether to compress the data.
    pub compressed: bool,
}

impl SetDataConfig {
    /// Compiles a set-data descriptor.
    pub fn compile(&self, path: &str, payload: Option<Bytes>) -> ArborResult<OperationDescriptor> {
        require_path(path)?;
        Ok(OperationDescriptor::new(
            path,
            payload,
            OperationParams::SetData {
                version: self.version,
                compressed: self.compressed,
            },
        ))
    }
}

/// Accumulated configuration of an asynchronous existence check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistsConfig {
    /// Parent-creation options applied while checking.
    pub options: CreateOptions,
}

impl ExistsConfig {
    /// Compiles an exists descriptor.
    pub fn compile(&self, path: &str) -> ArborResult<OperationDescriptor> {
        require_path(path)?;
        Ok(OperationDescriptor::new(
            path,
            None,
            OperationParams::Exists {
                options: self.options,
            },
        ))
    }
}

/// Accumulated configuration of a transactional create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxnCreateConfig {
    /// Creation mode.
    pub mode: CreateMode,
    /// ACL, or `None` for the service default.
    pub acl: Option<AclList>,
    /// Whether to compress the data.
    pub compressed: bool,
}

/// Configuration of one transactional operation, tagged by flavor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxnTemplate {
    /// Create a node.
    Create(TxnCreateConfig),
    /// Delete a node.
    Delete {
        /// Version guard.
        version: Version,
    },
    /// Replace a node's data.
    SetData(SetDataConfig),
    /// Require a node version.
    Check {
        /// Required version.
        version: Version,
    },
}

impl TxnTemplate {
    /// Compiles the transactional operation into a descriptor.
    ///
    /// Unlike the single-operation configurations, the path must also satisfy
    /// the service grammar: a malformed path fails with
    /// [`ProtoError::InvalidPath`](arbor_proto::ProtoError::InvalidPath).
    pub fn compile(&self, path: &str, payload: Option<Bytes>) -> ArborResult<OperationDescriptor> {
        let descriptor = self.describe(path, payload)?;
        if descriptor.mode().is_some_and(CreateMode::is_sequential) {
            validate_sequential_path(path)?;
        } else {
            validate_path(path)?;
        }
        Ok(descriptor)
    }

    fn describe(&self, path: &str, payload: Option<Bytes>) -> ArborResult<OperationDescriptor> {
        match self {
            TxnTemplate::Create(config) => CreateConfig {
                mode: config.mode,
                acl: config.acl.clone(),
                options: if config.compressed {
                    CreateOptions::from(CreateOption::Compress)
                } else {
                    CreateOptions::empty()
                },
                stat: None,
            }
            .compile(path, payload),
            TxnTemplate::Delete { version } => DeleteConfig {
                version: *version,
                options: DeleteOptions::empty(),
            }
            .compile(path),
            TxnTemplate::SetData(config) => config.compile(path, payload),
            TxnTemplate::Check { version } => {
                require_path(path)?;
                Ok(OperationDescriptor::new(
                    path,
                    None,
                    OperationParams::Check { version: *version },
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_proto::{OperationKind, ProtoError};

    #[test]
    fn empty_path_is_rejected() {
        let err = CreateConfig::default().compile("", None).unwrap_err();
        assert_eq!(
            err,
            ArborError::invalid_argument("path", "path cannot be empty")
        );
        assert!(DeleteConfig::default().compile("").is_err());
        assert!(ExistsConfig::default().compile("").is_err());
        assert!(TxnTemplate::Check {
            version: Version::ANY
        }
        .compile("", None)
        .is_err());
    }

    #[test]
    fn create_carries_every_field() {
        let slot = StatSlot::new();
        let config = CreateConfig {
            mode: CreateMode::EphemeralSequential,
            acl: Some(AclList::creator_all()),
            options: CreateOptions::from(CreateOption::CreateParentsIfNeeded),
            stat: Some(slot.clone()),
        };
        let op = config.compile("/a/b", Some(Bytes::from_static(b"x"))).unwrap();
        assert_eq!(op.path(), "/a/b");
        assert_eq!(op.payload().map(|p| p.as_ref()), Some(&b"x"[..]));
        assert_eq!(op.mode(), Some(CreateMode::EphemeralSequential));
        assert_eq!(op.acl(), Some(&AclList::creator_all()));
        assert!(op.stat_slot().is_some_and(|s| s.ptr_eq(&slot)));
    }

    #[test]
    fn txn_create_maps_compression_to_option() {
        let template = TxnTemplate::Create(TxnCreateConfig {
            compressed: true,
            ..TxnCreateConfig::default()
        });
        let op = template.compile("/a", None).unwrap();
        assert!(op.compressed());
        assert_eq!(op.stat_slot(), None);
    }

    #[test]
    fn txn_flavors() {
        let check = TxnTemplate::Check {
            version: Version::new(4),
        }
        .compile("/a", None)
        .unwrap();
        assert_eq!(check.kind(), OperationKind::Check);
        assert_eq!(check.version(), Some(Version::new(4)));

        let delete = TxnTemplate::Delete {
            version: Version::new(1),
        }
        .compile("/a", None)
        .unwrap();
        assert_eq!(delete.kind(), OperationKind::Delete);
        assert_eq!(delete.payload(), None);
    }

    #[test]
    fn txn_path_grammar_is_checked() {
        let check = TxnTemplate::Check {
            version: Version::ANY,
        };
        let err = check.compile("relative/path", None).unwrap_err();
        assert!(matches!(
            err,
            ArborError::Proto(ProtoError::InvalidPath { .. })
        ));
        assert!(err.is_invalid_argument());
        assert!(check.compile("/a//b", None).is_err());
        assert!(check.compile("/a/", None).is_err());

        // Empty paths keep their dedicated error.
        assert_eq!(
            check.compile("", None).unwrap_err(),
            ArborError::invalid_argument("path", "path cannot be empty")
        );

        let sequential = TxnTemplate::Create(TxnCreateConfig {
            mode: CreateMode::PersistentSequential,
            ..TxnCreateConfig::default()
        });
        assert!(sequential.compile("/queue/", None).is_ok());
        assert!(TxnTemplate::Create(TxnCreateConfig::default())
            .compile("/queue/", None)
            .is_err());
    }
}
