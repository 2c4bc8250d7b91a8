//! Shared error type across brove crates.

use thiserror::Error;

/// Stable error codes (operator tooling and health probes key on these).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Backing storage unreachable or a query failed.
    Connectivity,
    /// Removal targeted an identity that is not a member.
    NotFound,
    /// Empty or malformed identity on a mutating operation.
    Validation,
    /// Malformed input (config, management call).
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Connectivity => "CONNECTIVITY",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Validation => "VALIDATION",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, BroveError>;

/// Unified error type used by core and relay.
///
/// A negative authorization decision is *not* an error; it is returned as a
/// policy decision. Only exceptional conditions live here.
#[derive(Debug, Error)]
pub enum BroveError {
    #[error("storage unavailable: {0}")]
    Connectivity(String),
    #[error("pubkey {0} not found in allowed list")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl BroveError {
    /// Map internal error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            BroveError::Connectivity(_) => ErrorCode::Connectivity,
            BroveError::NotFound(_) => ErrorCode::NotFound,
            BroveError::Validation(_) => ErrorCode::Validation,
            BroveError::BadRequest(_) => ErrorCode::BadRequest,
            BroveError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            BroveError::Internal(_) => ErrorCode::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BroveError::NotFound(_))
    }
}
