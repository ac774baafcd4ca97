//! Node creation modes.

use crate::error::{ProtoError, ProtoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle classification of a created node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CreateMode {
    /// Node outlives the session that created it.
    #[default]
    Persistent,
    /// Persistent node with a monotonically increasing suffix.
    PersistentSequential,
    /// Node removed when the creating session ends.
    Ephemeral,
    /// Ephemeral node with a monotonically increasing suffix.
    EphemeralSequential,
    /// Node removed by the server once its last child is gone.
    Container,
    /// Persistent node removed after a TTL with no children or updates.
    PersistentWithTtl,
    /// Sequential variant of [`CreateMode::PersistentWithTtl`].
    PersistentSequentialWithTtl,
}

impl CreateMode {
    /// Every mode, in flag order.
    pub const ALL: [CreateMode; 7] = [
        CreateMode::Persistent,
        CreateMode::Ephemeral,
        CreateMode::PersistentSequential,
        CreateMode::EphemeralSequential,
        CreateMode::Container,
        CreateMode::PersistentWithTtl,
        CreateMode::PersistentSequentialWithTtl,
    ];

    /// Returns the numeric flag used by the service.
    #[must_use]
    pub const fn to_flag(self) -> i32 {
        match self {
            CreateMode::Persistent => 0,
            CreateMode::Ephemeral => 1,
            CreateMode::PersistentSequential => 2,
            CreateMode::EphemeralSequential => 3,
            CreateMode::Container => 4,
            CreateMode::PersistentWithTtl => 5,
            CreateMode::PersistentSequentialWithTtl => 6,
        }
    }

    /// Parses a numeric service flag.
    pub fn from_flag(flag: i32) -> ProtoResult<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.to_flag() == flag)
            .ok_or_else(|| {
                ProtoError::invalid_argument("createMode", format!("unknown create mode flag {flag}"))
            })
    }

    /// Returns true if the server appends a sequence suffix.
    #[must_use]
    pub const fn is_sequential(self) -> bool {
        matches!(
            self,
            CreateMode::PersistentSequential
                | CreateMode::EphemeralSequential
                | CreateMode::PersistentSequentialWithTtl
        )
    }

    /// Returns true if the node is tied to the session.
    #[must_use]
    pub const fn is_ephemeral(self) -> bool {
        matches!(self, CreateMode::Ephemeral | CreateMode::EphemeralSequential)
    }

    /// Returns true for container nodes.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, CreateMode::Container)
    }

    /// Returns true for TTL nodes.
    #[must_use]
    pub const fn is_ttl(self) -> bool {
        matches!(
            self,
            CreateMode::PersistentWithTtl | CreateMode::PersistentSequentialWithTtl
        )
    }
}

impl fmt::Display for CreateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CreateMode::Persistent => "PERSISTENT",
            CreateMode::PersistentSequential => "PERSISTENT_SEQUENTIAL",
            CreateMode::Ephemeral => "EPHEMERAL",
            CreateMode::EphemeralSequential => "EPHEMERAL_SEQUENTIAL",
            CreateMode::Container => "CONTAINER",
            CreateMode::PersistentWithTtl => "PERSISTENT_WITH_TTL",
            CreateMode::PersistentSequentialWithTtl => "PERSISTENT_SEQUENTIAL_WITH_TTL",
        };
        f.write_str(name)
    }
}
