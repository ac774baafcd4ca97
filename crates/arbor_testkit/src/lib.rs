//! # Arbor Testkit
//!
//! Test utilities for the Arbor coordination client.
//!
//! This crate provides:
//! - Fixtures: sample ACLs, paths and payloads, and a pool of stat slots
//! - Property-based test generators using proptest, including a model of
//!   the create builder's setters
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbor_testkit::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn last_setter_wins(setters in create_setters_strategy(1..8)) {
//!         let expected = ExpectedCreate::from_setters(&setters);
//!         // ... apply the setters to a builder and compare
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use proptest::prelude::*;
}

pub use fixtures::*;
pub use generators::*;
