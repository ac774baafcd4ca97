//! Error types for the asynchronous façade.

use crate::executor::OperationResult;
use arbor_proto::{ErrorCode, OperationKind, ProtoError};
use thiserror::Error;

/// Result type for façade operations.
pub type ArborResult<T> = Result<T, ArborError>;

/// Broad category of an [`ArborError`], used to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request was malformed; fix the input before retrying.
    Malformed,
    /// The service rejected a well-formed request (node exists, bad version).
    Rejected,
    /// The connection failed; the same request may succeed later.
    Transient,
    /// An invariant inside the client or executor was violated.
    Internal,
}

/// Errors that can occur while configuring or running operations.
///
/// Errors are `Clone` so one outcome can be delivered to every observer of
/// a handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArborError {
    /// A required argument was missing or invalid. Raised synchronously,
    /// before the executor is contacted.
    #[error("invalid argument `{name}`: {message}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// The service rejected the operation.
    #[error("{code} for path {path}")]
    Operation {
        /// Service result code.
        code: ErrorCode,
        /// Path of the failed operation.
        path: String,
    },

    /// The executor returned a result of the wrong shape.
    #[error("executor returned {actual} for a {expected} operation")]
    UnexpectedResult {
        /// Kind of the submitted operation.
        expected: OperationKind,
        /// Shape of the returned result.
        actual: &'static str,
    },

    /// A commit answered with a different number of results than units.
    #[error("transaction of {units} units returned {results} results")]
    ResultCountMismatch {
        /// Units submitted.
        units: usize,
        /// Results returned.
        results: usize,
    },

    /// The executor panicked while running an operation.
    #[error("executor panicked: {message}")]
    ExecutorPanicked {
        /// Panic payload, if it was a string.
        message: String,
    },

    /// The operation could not be handed to a worker.
    #[error("could not dispatch operation: {message}")]
    Dispatch {
        /// Cause reported by the worker pool.
        message: String,
    },

    /// The worker dropped the operation without producing an outcome.
    #[error("operation abandoned before completion")]
    Abandoned,

    /// A transaction unit failed to compile. Only ever used as the payload
    /// of the resulting panic.
    #[error("transaction unit for {path} failed to compile: {reason}")]
    FatalCompilation {
        /// Path of the unit.
        path: String,
        /// Cause reported by the executor.
        reason: String,
    },

    /// Operation-model error.
    #[error(transparent)]
    Proto(#[from] ProtoError),
}

impl ArborError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// Creates a service rejection error.
    pub fn operation(code: ErrorCode, path: impl Into<String>) -> Self {
        Self::Operation {
            code,
            path: path.into(),
        }
    }

    /// Creates an unexpected result error.
    pub fn unexpected_result(expected: OperationKind, actual: &OperationResult) -> Self {
        Self::UnexpectedResult {
            expected,
            actual: actual.shape(),
        }
    }

    /// Returns the service code of a rejection.
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ArborError::Operation { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Classifies the error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            ArborError::InvalidArgument { .. } => ErrorClass::Malformed,
            ArborError::Operation { code, .. } if code.is_transient() => ErrorClass::Transient,
            ArborError::Operation { code, .. } if code.is_malformed_request() => {
                ErrorClass::Malformed
            }
            ArborError::Operation { .. } => ErrorClass::Rejected,
            ArborError::Dispatch { .. } => ErrorClass::Transient,
            ArborError::Proto(ProtoError::Codec(_)) => ErrorClass::Internal,
            ArborError::Proto(_) => ErrorClass::Malformed,
            ArborError::UnexpectedResult { .. }
            | ArborError::ResultCountMismatch { .. }
            | ArborError::ExecutorPanicked { .. }
            | ArborError::Abandoned
            | ArborError::FatalCompilation { .. } => ErrorClass::Internal,
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Returns true if the error signals a broken invariant rather than a
    /// failed operation.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.class() == ErrorClass::Internal
    }

    /// Returns true for argument errors, whichever layer raised them.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ArborError::InvalidArgument { .. }
                | ArborError::Proto(ProtoError::InvalidArgument { .. })
                | ArborError::Proto(ProtoError::InvalidPath { .. })
        )
    }
}
