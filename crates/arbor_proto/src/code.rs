//! Result codes reported by the coordination service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A failure code returned by the service for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Unclassified server-side failure.
    SystemError,
    /// Connection to the server was lost mid-operation.
    ConnectionLoss,
    /// The server does not support the operation.
    Unimplemented,
    /// The operation did not complete in time.
    OperationTimeout,
    /// The request was malformed.
    BadArguments,
    /// The node does not exist.
    NoNode,
    /// Not authorized.
    NoAuth,
    /// The expected version did not match.
    BadVersion,
    /// Ephemeral nodes may not have children.
    NoChildrenForEphemerals,
    /// The node already exists.
    NodeExists,
    /// The node has children.
    NotEmpty,
    /// The session has expired.
    SessionExpired,
    /// The ACL is invalid.
    InvalidAcl,
    /// A previous operation in the same transaction failed, so this one
    /// was not applied.
    RuntimeInconsistency,
}

impl ErrorCode {
    /// Returns the numeric code used on the wire.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            ErrorCode::SystemError => -1,
            ErrorCode::RuntimeInconsistency => -2,
            ErrorCode::ConnectionLoss => -4,
            ErrorCode::Unimplemented => -6,
            ErrorCode::OperationTimeout => -7,
            ErrorCode::BadArguments => -8,
            ErrorCode::NoNode => -101,
            ErrorCode::NoAuth => -102,
            ErrorCode::BadVersion => -103,
            ErrorCode::NoChildrenForEphemerals => -108,
            ErrorCode::NodeExists => -110,
            ErrorCode::NotEmpty => -111,
            ErrorCode::SessionExpired => -112,
            ErrorCode::InvalidAcl => -114,
        }
    }

    /// Parses a wire code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        const ALL: [ErrorCode; 14] = [
            ErrorCode::SystemError,
            ErrorCode::RuntimeInconsistency,
            ErrorCode::ConnectionLoss,
            ErrorCode::Unimplemented,
            ErrorCode::OperationTimeout,
            ErrorCode::BadArguments,
            ErrorCode::NoNode,
            ErrorCode::NoAuth,
            ErrorCode::BadVersion,
            ErrorCode::NoChildrenForEphemerals,
            ErrorCode::NodeExists,
            ErrorCode::NotEmpty,
            ErrorCode::SessionExpired,
            ErrorCode::InvalidAcl,
        ];
        ALL.into_iter().find(|c| c.code() == code)
    }

    /// Returns true for failures caused by the connection rather than the
    /// request. Such operations may succeed if retried.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(
            self,
            ErrorCode::ConnectionLoss | ErrorCode::OperationTimeout | ErrorCode::SessionExpired
        )
    }

    /// Returns true if the request itself was malformed.
    #[must_use]
    pub const fn is_malformed_request(self) -> bool {
        matches!(
            self,
            ErrorCode::BadArguments | ErrorCode::InvalidAcl | ErrorCode::Unimplemented
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorCode::SystemError => "system error",
            ErrorCode::RuntimeInconsistency => "runtime inconsistency",
            ErrorCode::ConnectionLoss => "connection loss",
            ErrorCode::Unimplemented => "unimplemented",
            ErrorCode::OperationTimeout => "operation timeout",
            ErrorCode::BadArguments => "bad arguments",
            ErrorCode::NoNode => "no node",
            ErrorCode::NoAuth => "not authenticated",
            ErrorCode::BadVersion => "bad version",
            ErrorCode::NoChildrenForEphemerals => "no children for ephemerals",
            ErrorCode::NodeExists => "node exists",
            ErrorCode::NotEmpty => "directory not empty",
            ErrorCode::SessionExpired => "session expired",
            ErrorCode::InvalidAcl => "invalid ACL",
        };
        f.write_str(text)
    }
}
