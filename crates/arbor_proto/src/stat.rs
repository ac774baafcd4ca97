//! Node metadata and the caller-owned slot it is written into.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Metadata the service keeps for every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stat {
    /// Transaction id that created the node.
    pub czxid: i64,
    /// Transaction id that last modified the node.
    pub mzxid: i64,
    /// Creation time, milliseconds since the epoch.
    pub ctime: i64,
    /// Last modification time, milliseconds since the epoch.
    pub mtime: i64,
    /// Number of data changes.
    pub version: i32,
    /// Number of child list changes.
    pub cversion: i32,
    /// Number of ACL changes.
    pub aversion: i32,
    /// Owning session for ephemeral nodes, 0 otherwise.
    pub ephemeral_owner: i64,
    /// Length of the data field.
    pub data_length: i32,
    /// Number of children.
    pub num_children: i32,
    /// Transaction id that last modified the children.
    pub pzxid: i64,
}

/// A shared output slot for post-operation metadata.
///
/// The caller creates the slot and hands a clone to a builder; the executor
/// fills it as a side effect of the call. Two slots are equal only if they
/// are the same slot.
#[derive(Clone, Default)]
pub struct StatSlot(Arc<Mutex<Option<Stat>>>);

impl StatSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored metadata, if the executor has filled the slot.
    #[must_use]
    pub fn get(&self) -> Option<Stat> {
        *self.0.lock()
    }

    /// Stores metadata. Called by executors.
    pub fn set(&self, stat: Stat) {
        *self.0.lock() = Some(stat);
    }

    /// Empties the slot.
    pub fn clear(&self) {
        *self.0.lock() = None;
    }

    /// Returns true if both handles refer to the same slot.
    #[must_use]
    pub fn ptr_eq(&self, other: &StatSlot) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for StatSlot {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for StatSlot {}

impl fmt::Debug for StatSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StatSlot").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_starts_empty() {
        assert_eq!(StatSlot::new().get(), None);
    }

    #[test]
    fn clones_observe_writes() {
        let slot = StatSlot::new();
        let executor_side = slot.clone();
        executor_side.set(Stat {
            version: 3,
            ..Stat::default()
        });
        assert_eq!(slot.get().map(|s| s.version), Some(3));

        slot.clear();
        assert_eq!(executor_side.get(), None);
    }

    #[test]
    fn equality_is_identity() {
        let a = StatSlot::new();
        let b = StatSlot::new();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
