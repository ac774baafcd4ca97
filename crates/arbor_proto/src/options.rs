//! Boolean option flags for create and delete operations.
//!
//! Options are carried as small bit sets. Membership is queried with
//! [`OptionSet::contains`]; the set has no meaningful order.

use crate::error::{ProtoError, ProtoResult};
use std::fmt;
use std::marker::PhantomData;

/// A flag that can be stored in an [`OptionSet`].
pub trait OptionFlag: Copy + Eq + fmt::Debug + 'static {
    /// Every flag of this type.
    const ALL: &'static [Self];

    /// Bit assigned to this flag.
    fn bit(self) -> u8;
}

/// Options accepted by create (and check-exists) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreateOption {
    /// Create missing parent nodes.
    CreateParentsIfNeeded,
    /// Create missing parents as container nodes.
    CreateParentsAsContainers,
    /// Prefix the node name with a session-unique guard so a retried create
    /// can find its own node.
    DoProtected,
    /// Compress the payload before it is sent.
    Compress,
    /// If the node already exists, set its data instead of failing.
    SetDataIfExists,
}

impl OptionFlag for CreateOption {
    const ALL: &'static [Self] = &[
        CreateOption::CreateParentsIfNeeded,
        CreateOption::CreateParentsAsContainers,
        CreateOption::DoProtected,
        CreateOption::Compress,
        CreateOption::SetDataIfExists,
    ];

    fn bit(self) -> u8 {
        match self {
            CreateOption::CreateParentsIfNeeded => 1 << 0,
            CreateOption::CreateParentsAsContainers => 1 << 1,
            CreateOption::DoProtected => 1 << 2,
            CreateOption::Compress => 1 << 3,
            CreateOption::SetDataIfExists => 1 << 4,
        }
    }
}

/// Options accepted by delete operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteOption {
    /// Treat a missing node as success.
    Quietly,
    /// Delete the whole subtree.
    DeletingChildrenIfNeeded,
    /// Keep retrying in the background until the delete succeeds.
    Guaranteed,
}

impl OptionFlag for DeleteOption {
    const ALL: &'static [Self] = &[
        DeleteOption::Quietly,
        DeleteOption::DeletingChildrenIfNeeded,
        DeleteOption::Guaranteed,
    ];

    fn bit(self) -> u8 {
        match self {
            DeleteOption::Quietly => 1 << 0,
            DeleteOption::DeletingChildrenIfNeeded => 1 << 1,
            DeleteOption::Guaranteed => 1 << 2,
        }
    }
}

/// A set of option flags. The empty set is the default.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionSet<O: OptionFlag> {
    bits: u8,
    _flag: PhantomData<O>,
}

/// Flags for create operations.
pub type CreateOptions = OptionSet<CreateOption>;

/// Flags for delete operations.
pub type DeleteOptions = OptionSet<DeleteOption>;

impl<O: OptionFlag> OptionSet<O> {
    /// Returns the empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bits: 0,
            _flag: PhantomData,
        }
    }

    /// Returns a set containing every flag.
    #[must_use]
    pub fn all() -> Self {
        O::ALL.iter().copied().collect()
    }

    /// Builds a set from raw bits, rejecting bits no flag owns.
    pub fn from_bits(bits: u8) -> ProtoResult<Self> {
        let known = Self::all().bits;
        if bits & !known != 0 {
            return Err(ProtoError::invalid_argument(
                "options",
                format!("unknown option bits {:#04x}", bits & !known),
            ));
        }
        Ok(Self {
            bits,
            _flag: PhantomData,
        })
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    /// Returns the set with `flag` added.
    #[must_use]
    pub fn with(mut self, flag: O) -> Self {
        self.insert(flag);
        self
    }

    /// Adds a flag.
    pub fn insert(&mut self, flag: O) {
        self.bits |= flag.bit();
    }

    /// Removes a flag.
    pub fn remove(&mut self, flag: O) {
        self.bits &= !flag.bit();
    }

    /// Returns true if `flag` is in the set.
    #[must_use]
    pub fn contains(self, flag: O) -> bool {
        self.bits & flag.bit() != 0
    }

    /// Returns true if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }
}

impl<O: OptionFlag> Default for OptionSet<O> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<O: OptionFlag> FromIterator<O> for OptionSet<O> {
    fn from_iter<I: IntoIterator<Item = O>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl<O: OptionFlag> From<O> for OptionSet<O> {
    fn from(flag: O) -> Self {
        Self::empty().with(flag)
    }
}

impl<O: OptionFlag> fmt::Debug for OptionSet<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(O::ALL.iter().filter(|flag| self.contains(**flag)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_by_default() {
        let options = CreateOptions::default();
        assert!(options.is_empty());
        for flag in CreateOption::ALL {
            assert!(!options.contains(*flag));
        }
    }

    #[test]
    fn membership() {
        let options: CreateOptions = [CreateOption::Compress, CreateOption::DoProtected]
            .into_iter()
            .collect();
        assert!(options.contains(CreateOption::Compress));
        assert!(options.contains(CreateOption::DoProtected));
        assert!(!options.contains(CreateOption::CreateParentsIfNeeded));
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = CreateOptions::empty()
            .with(CreateOption::SetDataIfExists)
            .with(CreateOption::CreateParentsIfNeeded);
        let b = CreateOptions::empty()
            .with(CreateOption::CreateParentsIfNeeded)
            .with(CreateOption::SetDataIfExists)
            .with(CreateOption::SetDataIfExists);
        assert_eq!(a, b);
    }

    #[test]
    fn remove_flag() {
        let mut options = DeleteOptions::all();
        options.remove(DeleteOption::Guaranteed);
        assert!(options.contains(DeleteOption::Quietly));
        assert!(!options.contains(DeleteOption::Guaranteed));
    }

    #[test]
    fn from_bits_rejects_unknown() {
        assert_eq!(
            CreateOptions::from_bits(0b1_1111).unwrap(),
            CreateOptions::all()
        );
        let err = DeleteOptions::from_bits(0b1000).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::InvalidArgument {
                name: "options",
                ..
            }
        ));
    }

    #[test]
    fn debug_lists_members() {
        let options = CreateOptions::from(CreateOption::Compress);
        assert_eq!(format!("{options:?}"), "{Compress}");
    }
}
