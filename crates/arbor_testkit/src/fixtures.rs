//! Test fixtures.
//!
//! Sample values and small helpers shared by the client's test suites.

use arbor_proto::{
    Acl, AclList, CreateMode, CreateOptions, Id, OperationDescriptor, OperationParams, Perms,
    StatSlot, Version,
};
use bytes::Bytes;

/// Number of slots in a [`StatPool`].
pub const STAT_POOL_SIZE: usize = 4;

/// A fixed set of distinct stat slots, addressed by index.
///
/// Generated setter sequences refer to slots by index; the pool turns those
/// indices back into slots and lets tests check slot identity.
#[derive(Debug, Clone)]
pub struct StatPool {
    slots: Vec<StatSlot>,
}

impl StatPool {
    /// Creates a pool of [`STAT_POOL_SIZE`] fresh slots.
    pub fn new() -> Self {
        Self {
            slots: (0..STAT_POOL_SIZE).map(|_| StatSlot::new()).collect(),
        }
    }

    /// Returns the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn slot(&self, index: usize) -> StatSlot {
        self.slots[index].clone()
    }

    /// Returns the index of `slot`, if it belongs to this pool.
    pub fn index_of(&self, slot: &StatSlot) -> Option<usize> {
        self.slots.iter().position(|s| s.ptr_eq(slot))
    }
}

impl Default for StatPool {
    fn default() -> Self {
        Self::new()
    }
}

/// An ACL granting everything to a digest user.
pub fn digest_acl(user: &str) -> AclList {
    AclList::new(vec![Acl::new(
        Perms::ALL,
        Id::new("digest", format!("{user}:hash")),
    )])
}

/// Builds a path under `/fixtures` that is unique for `name` and `n`.
pub fn fixture_path(name: &str, n: usize) -> String {
    format!("/fixtures/{name}-{n}")
}

/// A small, recognizable payload.
pub fn sample_payload() -> Bytes {
    Bytes::from_static(b"arbor-fixture")
}

/// A persistent create descriptor with the sample payload.
pub fn sample_create(path: &str) -> OperationDescriptor {
    OperationDescriptor::new(
        path,
        Some(sample_payload()),
        OperationParams::Create {
            mode: CreateMode::Persistent,
            acl: None,
            options: CreateOptions::empty(),
            stat: None,
        },
    )
}

/// A check descriptor requiring `version`.
pub fn sample_check(path: &str, version: i32) -> OperationDescriptor {
    OperationDescriptor::new(
        path,
        None,
        OperationParams::Check {
            version: Version::new(version),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_slots_are_distinct() {
        let pool = StatPool::new();
        for i in 0..STAT_POOL_SIZE {
            assert_eq!(pool.index_of(&pool.slot(i)), Some(i));
        }
        assert_eq!(pool.index_of(&StatSlot::new()), None);
    }

    #[test]
    fn fixture_values() {
        assert_eq!(fixture_path("lock", 3), "/fixtures/lock-3");
        assert_eq!(digest_acl("bob")[0].id.to_string(), "digest:bob:hash");
        assert_eq!(sample_create("/a").payload(), Some(&sample_payload()));
        assert_eq!(sample_check("/a", 2).version(), Some(Version::new(2)));
    }
}
