//! Access-control lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, Deref};
use std::sync::Arc;

/// Permission bits granted by an ACL entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Perms(u32);

impl Perms {
    /// Read node data and list children.
    pub const READ: Perms = Perms(1 << 0);
    /// Set node data.
    pub const WRITE: Perms = Perms(1 << 1);
    /// Create children.
    pub const CREATE: Perms = Perms(1 << 2);
    /// Delete children.
    pub const DELETE: Perms = Perms(1 << 3);
    /// Change the ACL.
    pub const ADMIN: Perms = Perms(1 << 4);
    /// Every permission.
    pub const ALL: Perms = Perms(0b1_1111);

    /// Creates permissions from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if every bit of `other` is granted.
    #[must_use]
    pub const fn contains(self, other: Perms) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Perms {
    type Output = Perms;

    fn bitor(self, rhs: Perms) -> Perms {
        Perms(self.0 | rhs.0)
    }
}

/// An authenticated identity: `scheme:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id {
    /// Authentication scheme (`world`, `auth`, `digest`, `ip`, ...).
    pub scheme: String,
    /// Scheme-specific identity.
    pub id: String,
}

impl Id {
    /// Creates an identity.
    pub fn new(scheme: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            id: id.into(),
        }
    }

    /// Everyone.
    #[must_use]
    pub fn anyone() -> Self {
        Self::new("world", "anyone")
    }

    /// Whoever is authenticated on the creating connection.
    #[must_use]
    pub fn auth() -> Self {
        Self::new("auth", "")
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.id)
    }
}

/// One ACL entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Acl {
    /// Granted permissions.
    pub perms: Perms,
    /// Identity the permissions are granted to.
    pub id: Id,
}

impl Acl {
    /// Creates an ACL entry.
    #[must_use]
    pub fn new(perms: Perms, id: Id) -> Self {
        Self { perms, id }
    }
}

/// An ordered, shared ACL list.
///
/// Cloning shares the underlying entries; builders hold the list by reference
/// and never modify it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AclList(Arc<[Acl]>);

impl AclList {
    /// Creates a list from entries.
    pub fn new(entries: impl Into<Vec<Acl>>) -> Self {
        Self(Arc::from(entries.into()))
    }

    /// Completely open: everyone gets every permission.
    #[must_use]
    pub fn open_unsafe() -> Self {
        Self::new(vec![Acl::new(Perms::ALL, Id::anyone())])
    }

    /// Every permission for the creator's authenticated identity.
    #[must_use]
    pub fn creator_all() -> Self {
        Self::new(vec![Acl::new(Perms::ALL, Id::auth())])
    }

    /// Read-only for everyone.
    #[must_use]
    pub fn read_unsafe() -> Self {
        Self::new(vec![Acl::new(Perms::READ, Id::anyone())])
    }

    /// Returns true if both lists share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &AclList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the entries as an owned vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Acl> {
        self.0.to_vec()
    }
}

impl Deref for AclList {
    type Target = [Acl];

    fn deref(&self) -> &[Acl] {
        &self.0
    }
}

impl From<Vec<Acl>> for AclList {
    fn from(entries: Vec<Acl>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<Acl> for AclList {
    fn from_iter<I: IntoIterator<Item = Acl>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perms_combine() {
        let perms = Perms::READ | Perms::WRITE;
        assert!(perms.contains(Perms::READ));
        assert!(perms.contains(Perms::WRITE));
        assert!(!perms.contains(Perms::ADMIN));
        assert!(Perms::ALL.contains(perms));
        assert_eq!(Perms::ALL.bits(), 31);
    }

    #[test]
    fn well_known_lists() {
        let open = AclList::open_unsafe();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id.to_string(), "world:anyone");
        assert_eq!(open[0].perms, Perms::ALL);

        let read = AclList::read_unsafe();
        assert_eq!(read[0].perms, Perms::READ);

        let creator = AclList::creator_all();
        assert_eq!(creator[0].id.scheme, "auth");
    }

    #[test]
    fn clones_share_entries() {
        let list = AclList::open_unsafe();
        let copy = list.clone();
        assert!(list.ptr_eq(&copy));

        let rebuilt = AclList::new(list.to_vec());
        assert_eq!(list, rebuilt);
        assert!(!list.ptr_eq(&rebuilt));
    }
}
