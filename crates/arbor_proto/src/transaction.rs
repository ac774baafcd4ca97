//! Transaction units and results.
//!
//! A [`TransactionUnit`] is the compiled, inert form of a create, delete,
//! set-data or check descriptor. Units do nothing on their own; a list of
//! them is handed to an executor's commit capability, which applies them all
//! or none. Units and results are plain values and encode to CBOR.

use crate::acl::Acl;
use crate::code::ErrorCode;
use crate::descriptor::{OperationDescriptor, OperationParams};
use crate::error::{ProtoError, ProtoResult};
use crate::mode::CreateMode;
use crate::options::CreateOption;
use crate::path::{validate_path, validate_sequential_path};
use crate::stat::Stat;
use crate::version::Version;
use serde::{Deserialize, Serialize};

/// Type of a transactional operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpType {
    /// Create a node.
    Create,
    /// Delete a node.
    Delete,
    /// Replace a node's data.
    SetData,
    /// Assert a node's version.
    Check,
}

/// One operation of a multi-operation transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionUnit {
    /// Create a node.
    Create {
        /// Node path.
        path: String,
        /// Initial data; `None` if the caller gave none.
        data: Option<Vec<u8>>,
        /// ACL; `None` applies the service default.
        acl: Option<Vec<Acl>>,
        /// Creation mode.
        mode: CreateMode,
        /// Whether the data is compressed before sending.
        compressed: bool,
    },
    /// Delete a node.
    Delete {
        /// Node path.
        path: String,
        /// Version guard.
        version: Version,
    },
    /// Replace a node's data.
    SetData {
        /// Node path.
        path: String,
        /// New data.
        data: Option<Vec<u8>>,
        /// Version guard.
        version: Version,
        /// Whether the data is compressed before sending.
        compressed: bool,
    },
    /// Require a node to exist at a version.
    Check {
        /// Node path.
        path: String,
        /// Required version.
        version: Version,
    },
}

impl TransactionUnit {
    /// Compiles a descriptor into a unit.
    ///
    /// The path is validated against the service grammar; exists
    /// descriptors have no transactional form.
    pub fn compile(descriptor: &OperationDescriptor) -> ProtoResult<Self> {
        let path = descriptor.path().to_string();
        let data = descriptor.payload().map(|p| p.to_vec());

        let unit = match descriptor.params() {
            OperationParams::Create {
                mode, acl, options, ..
            } => {
                if mode.is_sequential() {
                    validate_sequential_path(&path)?;
                } else {
                    validate_path(&path)?;
                }
                TransactionUnit::Create {
                    path,
                    data,
                    acl: acl.as_ref().map(|list| list.to_vec()),
                    mode: *mode,
                    compressed: options.contains(CreateOption::Compress),
                }
            }
            OperationParams::Delete { version, .. } => {
                validate_path(&path)?;
                TransactionUnit::Delete {
                    path,
                    version: *version,
                }
            }
            OperationParams::SetData {
                version,
                compressed,
            } => {
                validate_path(&path)?;
                TransactionUnit::SetData {
                    path,
                    data,
                    version: *version,
                    compressed: *compressed,
                }
            }
            OperationParams::Check { version } => {
                validate_path(&path)?;
                TransactionUnit::Check {
                    path,
                    version: *version,
                }
            }
            OperationParams::Exists { .. } => {
                return Err(ProtoError::NotTransactional {
                    kind: descriptor.kind(),
                })
            }
        };
        Ok(unit)
    }

    /// Returns the operation type.
    #[must_use]
    pub fn op_type(&self) -> OpType {
        match self {
            TransactionUnit::Create { .. } => OpType::Create,
            TransactionUnit::Delete { .. } => OpType::Delete,
            TransactionUnit::SetData { .. } => OpType::SetData,
            TransactionUnit::Check { .. } => OpType::Check,
        }
    }

    /// Returns the target path.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            TransactionUnit::Create { path, .. }
            | TransactionUnit::Delete { path, .. }
            | TransactionUnit::SetData { path, .. }
            | TransactionUnit::Check { path, .. } => path,
        }
    }
}

/// Outcome of one unit of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    /// Operation type of the unit.
    pub op_type: OpType,
    /// Path the unit targeted.
    pub for_path: String,
    /// Actual path of a created node (differs for sequential creates).
    pub result_path: Option<String>,
    /// Metadata after a set-data.
    pub result_stat: Option<Stat>,
    /// Failure code if the transaction was rejected.
    pub error: Option<ErrorCode>,
}

impl TransactionResult {
    /// Creates a successful result for `unit`.
    #[must_use]
    pub fn success(unit: &TransactionUnit) -> Self {
        Self {
            op_type: unit.op_type(),
            for_path: unit.path().to_string(),
            result_path: None,
            result_stat: None,
            error: None,
        }
    }

    /// Sets the created path.
    #[must_use]
    pub fn with_result_path(mut self, path: impl Into<String>) -> Self {
        self.result_path = Some(path.into());
        self
    }

    /// Sets the resulting metadata.
    #[must_use]
    pub fn with_stat(mut self, stat: Stat) -> Self {
        self.result_stat = Some(stat);
        self
    }

    /// Sets the failure code.
    #[must_use]
    pub fn with_error(mut self, code: ErrorCode) -> Self {
        self.error = Some(code);
        self
    }

    /// Returns true if the unit was applied.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Encodes a list of units to CBOR.
pub fn encode_units(units: &[TransactionUnit]) -> ProtoResult<Vec<u8>> {
    encode(&units)
}

/// Decodes a list of units from CBOR.
pub fn decode_units(bytes: &[u8]) -> ProtoResult<Vec<TransactionUnit>> {
    decode(bytes)
}

/// Encodes a list of results to CBOR.
pub fn encode_results(results: &[TransactionResult]) -> ProtoResult<Vec<u8>> {
    encode(&results)
}

/// Decodes a list of results from CBOR.
pub fn decode_results(bytes: &[u8]) -> ProtoResult<Vec<TransactionResult>> {
    decode(bytes)
}

fn encode<T: Serialize>(value: &T) -> ProtoResult<Vec<u8>> {
    let mut out = Vec::new();
    ciborium::into_writer(value, &mut out).map_err(|e| ProtoError::codec(e.to_string()))?;
    Ok(out)
}

fn decode<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> ProtoResult<T> {
    ciborium::from_reader(bytes).map_err(|e| ProtoError::codec(e.to_string()))
}
