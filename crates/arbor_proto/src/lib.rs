//! # Arbor Proto
//!
//! Operation model for the Arbor coordination client.
//!
//! This crate provides:
//! - `CreateMode` and the create/delete option sets
//! - ACL lists, node metadata (`Stat`) and the `StatSlot` output slot
//! - `OperationDescriptor`, the immutable description of one operation
//! - `TransactionUnit` / `TransactionResult` and their CBOR encoding
//! - Path grammar validation and service error codes
//!
//! This is a pure data crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod acl;
mod code;
mod descriptor;
mod error;
mod mode;
mod options;
mod path;
mod stat;
mod transaction;
mod version;

pub use acl::{Acl, AclList, Id, Perms};
pub use code::ErrorCode;
pub use descriptor::{OperationDescriptor, OperationKind, OperationParams};
pub use error::{ProtoError, ProtoResult};
pub use mode::CreateMode;
pub use options::{
    CreateOption, CreateOptions, DeleteOption, DeleteOptions, OptionFlag, OptionSet,
};
pub use path::{validate_path, validate_sequential_path, SEPARATOR};
pub use stat::{Stat, StatSlot};
pub use transaction::{
    decode_results, decode_units, encode_results, encode_units, OpType, TransactionResult,
    TransactionUnit,
};
pub use version::Version;
