//! Error types for the membership service
//!
//! Validation failures from the core stay distinct from storage failures so
//! callers can answer the former with a 4xx and the latter with a 5xx.

use membership_core::MembershipError;
use thiserror::Error;

/// Errors raised by a membership store or user directory.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed record does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The write conflicts with existing data
    #[error("Conflicting write: {0}")]
    Conflict(String),

    /// The backend failed
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Membership service error types.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The mutation was rejected by a membership rule
    #[error(transparent)]
    Membership(#[from] MembershipError),

    /// No user matches the given login or email
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The store or directory failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Check if this error should be logged at error level.
    ///
    /// Rule violations are expected and should not be.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ServiceError::Store(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Membership(err) => err.status_code(),
            ServiceError::UserNotFound(_) => 404,
            ServiceError::Store(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Membership(err) => err.error_code(),
            ServiceError::UserNotFound(_) => "USER_NOT_FOUND",
            ServiceError::Store(_) => "STORAGE_ERROR",
        }
    }
}
