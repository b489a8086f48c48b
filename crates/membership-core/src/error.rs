//! Error types for membership operations
//!
//! These errors are validation failures: each one rejects the attempted
//! operation without touching the membership set.

use thiserror::Error;
use uuid::Uuid;

use crate::roles::RoleDecodeError;

/// Membership error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    /// A role string could not be decoded
    #[error(transparent)]
    RoleDecode(#[from] RoleDecodeError),

    /// The target user has no membership in the organization
    #[error("cannot find the organization user {user_id}")]
    MembershipNotFound {
        /// The user that was looked up
        user_id: Uuid,
    },

    /// The user already has a membership in the organization
    #[error("user {user_id} is already added to organization")]
    AlreadyMember {
        /// The user that was being added
        user_id: Uuid,
    },

    /// The mutation would leave the organization without an admin
    #[error("cannot remove last organization admin")]
    LastAdmin,
}

/// Result type for membership operations.
pub type MembershipResult<T> = Result<T, MembershipError>;

impl MembershipError {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            MembershipError::RoleDecode(_) => 400,
            MembershipError::MembershipNotFound { .. } => 404,
            MembershipError::AlreadyMember { .. } => 409,
            MembershipError::LastAdmin => 400,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            MembershipError::RoleDecode(_) => "INVALID_ROLE",
            MembershipError::MembershipNotFound { .. } => "MEMBERSHIP_NOT_FOUND",
            MembershipError::AlreadyMember { .. } => "ALREADY_MEMBER",
            MembershipError::LastAdmin => "LAST_ADMIN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_client_errors() {
        let errors = [
            MembershipError::RoleDecode(RoleDecodeError {
                raw: "Owner".to_string(),
            }),
            MembershipError::MembershipNotFound {
                user_id: Uuid::now_v7(),
            },
            MembershipError::AlreadyMember {
                user_id: Uuid::now_v7(),
            },
            MembershipError::LastAdmin,
        ];

        for err in errors {
            assert!((400..500).contains(&err.status_code()), "{err}");
        }
    }

    #[test]
    fn test_role_decode_message_names_raw_value() {
        let err: MembershipError = RoleDecodeError {
            raw: "Owner".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "INVALID_ROLE");
        assert!(err.to_string().contains("Owner"));
    }
}
