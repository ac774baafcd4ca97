//! Node data versions used as optimistic-concurrency guards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected data version of a node.
///
/// [`Version::ANY`] matches whatever version the node currently has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(pub i32);

impl Version {
    /// Matches any version.
    pub const ANY: Version = Version(-1);

    /// Creates a version guard.
    #[must_use]
    pub const fn new(version: i32) -> Self {
        Self(version)
    }

    /// Returns the raw version number.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Returns true if this guard matches any version.
    #[must_use]
    pub const fn is_any(self) -> bool {
        self.0 == -1
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::ANY
    }
}

impl From<i32> for Version {
    fn from(version: i32) -> Self {
        Self(version)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            f.write_str("any")
        } else {
            write!(f, "v{}", self.0)
        }
    }
}
