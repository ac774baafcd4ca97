//! Error types for the operation model.

use crate::descriptor::OperationKind;
use thiserror::Error;

/// Result type for operation-model functions.
pub type ProtoResult<T> = Result<T, ProtoError>;

/// Errors raised while building or encoding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtoError {
    /// A required value was missing or could not be interpreted.
    #[error("invalid argument `{name}`: {message}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// A node path does not follow the service path grammar.
    #[error("invalid path \"{path}\": {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The operation kind has no transactional form.
    #[error("{kind} operations cannot be part of a transaction")]
    NotTransactional {
        /// The rejected kind.
        kind: OperationKind,
    },

    /// CBOR encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(String),
}

impl ProtoError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a codec error.
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_names_parameter() {
        let err = ProtoError::invalid_argument("createMode", "unknown flag 9");
        assert_eq!(
            err.to_string(),
            "invalid argument `createMode`: unknown flag 9"
        );
    }

    #[test]
    fn not_transactional_display() {
        let err = ProtoError::NotTransactional {
            kind: OperationKind::Exists,
        };
        assert_eq!(
            err.to_string(),
            "exists operations cannot be part of a transaction"
        );
    }
}
