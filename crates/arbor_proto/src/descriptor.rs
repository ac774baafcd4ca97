//! Operation descriptors.
//!
//! An [`OperationDescriptor`] is one fully specified operation: a path, an
//! optional payload and the parameters of its kind. Descriptors are built
//! once by a builder's terminal call, are never modified afterwards, and are
//! consumed by an executor either directly or after being compiled into a
//! transaction unit.

use crate::acl::AclList;
use crate::mode::CreateMode;
use crate::options::{CreateOption, CreateOptions, DeleteOptions};
use crate::stat::StatSlot;
use crate::version::Version;
use bytes::Bytes;
use std::fmt;

/// Kind of operation a descriptor represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Create a node.
    Create,
    /// Delete a node.
    Delete,
    /// Replace a node's data.
    SetData,
    /// Assert a node's version (transactions only).
    Check,
    /// Read a node's metadata if it exists.
    Exists,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Create => "create",
            OperationKind::Delete => "delete",
            OperationKind::SetData => "setData",
            OperationKind::Check => "check",
            OperationKind::Exists => "exists",
        };
        f.write_str(name)
    }
}

/// Kind-specific parameters of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationParams {
    /// Create parameters.
    Create {
        /// Creation mode.
        mode: CreateMode,
        /// ACL for the new node; `None` lets the service apply its default.
        acl: Option<AclList>,
        /// Create flags.
        options: CreateOptions,
        /// Slot that receives the new node's metadata.
        stat: Option<StatSlot>,
    },
    /// Delete parameters.
    Delete {
        /// Version guard.
        version: Version,
        /// Delete flags.
        options: DeleteOptions,
    },
    /// Set-data parameters.
    SetData {
        /// Version guard.
        version: Version,
        /// Whether the payload is compressed before sending.
        compressed: bool,
    },
    /// Version check parameters.
    Check {
        /// Version the node must have.
        version: Version,
    },
    /// Exists parameters.
    Exists {
        /// Parent-creation flags.
        options: CreateOptions,
    },
}

impl OperationParams {
    /// Returns the operation kind.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationParams::Create { .. } => OperationKind::Create,
            OperationParams::Delete { .. } => OperationKind::Delete,
            OperationParams::SetData { .. } => OperationKind::SetData,
            OperationParams::Check { .. } => OperationKind::Check,
            OperationParams::Exists { .. } => OperationKind::Exists,
        }
    }
}

/// One fully specified operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    path: String,
    payload: Option<Bytes>,
    params: OperationParams,
}

impl OperationDescriptor {
    /// Creates a descriptor.
    pub fn new(path: impl Into<String>, payload: Option<Bytes>, params: OperationParams) -> Self {
        Self {
            path: path.into(),
            payload,
            params,
        }
    }

    /// Returns the target path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the payload. `None` means the caller supplied no payload,
    /// which is distinct from an empty one.
    #[must_use]
    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Returns the kind-specific parameters.
    #[must_use]
    pub fn params(&self) -> &OperationParams {
        &self.params
    }

    /// Returns the operation kind.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.params.kind()
    }

    /// Returns the creation mode of a create.
    #[must_use]
    pub fn mode(&self) -> Option<CreateMode> {
        match &self.params {
            OperationParams::Create { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    /// Returns the ACL of a create.
    #[must_use]
    pub fn acl(&self) -> Option<&AclList> {
        match &self.params {
            OperationParams::Create { acl, .. } => acl.as_ref(),
            _ => None,
        }
    }

    /// Returns the version guard of a delete, set-data or check.
    #[must_use]
    pub fn version(&self) -> Option<Version> {
        match &self.params {
            OperationParams::Delete { version, .. }
            | OperationParams::SetData { version, .. }
            | OperationParams::Check { version } => Some(*version),
            _ => None,
        }
    }

    /// Returns true if the payload is to be compressed.
    #[must_use]
    pub fn compressed(&self) -> bool {
        match &self.params {
            OperationParams::Create { options, .. } => options.contains(CreateOption::Compress),
            OperationParams::SetData { compressed, .. } => *compressed,
            _ => false,
        }
    }

    /// Returns the create flags of a create or exists.
    #[must_use]
    pub fn create_options(&self) -> Option<CreateOptions> {
        match &self.params {
            OperationParams::Create { options, .. } | OperationParams::Exists { options } => {
                Some(*options)
            }
            _ => None,
        }
    }

    /// Returns the delete flags of a delete.
    #[must_use]
    pub fn delete_options(&self) -> Option<DeleteOptions> {
        match &self.params {
            OperationParams::Delete { options, .. } => Some(*options),
            _ => None,
        }
    }

    /// Returns the metadata slot of a create.
    #[must_use]
    pub fn stat_slot(&self) -> Option<&StatSlot> {
        match &self.params {
            OperationParams::Create { stat, .. } => stat.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(payload: Option<Bytes>) -> OperationDescriptor {
        OperationDescriptor::new(
            "/x",
            payload,
            OperationParams::Create {
                mode: CreateMode::Persistent,
                acl: None,
                options: CreateOptions::empty(),
                stat: None,
            },
        )
    }

    #[test]
    fn absent_and_empty_payload_differ() {
        let absent = create(None);
        let empty = create(Some(Bytes::new()));
        assert!(absent.payload().is_none());
        assert_eq!(empty.payload().map(|p| p.len()), Some(0));
        assert_ne!(absent, empty);
    }

    #[test]
    fn accessors_follow_kind() {
        let op = create(None);
        assert_eq!(op.kind(), OperationKind::Create);
        assert_eq!(op.mode(), Some(CreateMode::Persistent));
        assert_eq!(op.version(), None);

        let delete = OperationDescriptor::new(
            "/x",
            None,
            OperationParams::Delete {
                version: Version::new(4),
                options: DeleteOptions::empty(),
            },
        );
        assert_eq!(delete.kind(), OperationKind::Delete);
        assert_eq!(delete.version(), Some(Version::new(4)));
        assert_eq!(delete.mode(), None);
        assert!(!delete.compressed());
    }

    #[test]
    fn compression_flag() {
        let op = OperationDescriptor::new(
            "/x",
            None,
            OperationParams::Create {
                mode: CreateMode::Persistent,
                acl: None,
                options: CreateOptions::from(CreateOption::Compress),
                stat: None,
            },
        );
        assert!(op.compressed());

        let set = OperationDescriptor::new(
            "/x",
            Some(Bytes::from_static(b"v")),
            OperationParams::SetData {
                version: Version::ANY,
                compressed: true,
            },
        );
        assert!(set.compressed());
    }

    #[test]
    fn stat_slot_identity_matters() {
        let slot = StatSlot::new();
        let with_slot = |stat: Option<StatSlot>| {
            OperationDescriptor::new(
                "/x",
                None,
                OperationParams::Create {
                    mode: CreateMode::Persistent,
                    acl: None,
                    options: CreateOptions::empty(),
                    stat,
                },
            )
        };
        assert_eq!(with_slot(Some(slot.clone())), with_slot(Some(slot)));
        assert_ne!(with_slot(Some(StatSlot::new())), with_slot(Some(StatSlot::new())));
    }
}
