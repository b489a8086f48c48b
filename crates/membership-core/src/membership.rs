//! Membership domain model
//!
//! This module provides the membership entity that links a user to an
//! organization with a single role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::Role;

/// Organization membership linking a user to an organization.
///
/// A user holds at most one membership per organization; memberships in
/// different organizations are independent.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use membership_core::{OrgMembership, Role};
///
/// let org_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let membership = OrgMembership::new(org_id, user_id, Role::Editor);
/// assert_eq!(membership.created_at, membership.updated_at);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgMembership {
    /// Unique membership ID
    pub id: Uuid,

    /// Organization ID
    pub organization_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the organization
    pub role: Role,

    /// When the membership was created
    pub created_at: DateTime<Utc>,

    /// When the role was last changed
    pub updated_at: DateTime<Utc>,
}

impl OrgMembership {
    /// Creates a new organization membership.
    ///
    /// The membership is created with:
    /// - A newly generated UUID v7 ID
    /// - Current timestamp for both created_at and updated_at
    ///
    /// # Arguments
    ///
    /// * `organization_id` - The organization ID
    /// * `user_id` - The user ID
    /// * `role` - The user's role in the organization
    pub fn new(organization_id: Uuid, user_id: Uuid, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            organization_id,
            user_id,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the role and bump the update timestamp.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Check if this membership holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_creation() {
        let org_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();
        let membership = OrgMembership::new(org_id, user_id, Role::Viewer);

        assert_eq!(membership.organization_id, org_id);
        assert_eq!(membership.user_id, user_id);
        assert_eq!(membership.role, Role::Viewer);
        assert!(!membership.is_admin());
    }

    #[test]
    fn test_set_role_bumps_updated_at() {
        let mut membership = OrgMembership::new(Uuid::now_v7(), Uuid::now_v7(), Role::Viewer);
        let created = membership.created_at;

        membership.set_role(Role::Admin);

        assert!(membership.is_admin());
        assert_eq!(membership.created_at, created);
        assert!(membership.updated_at >= created);
    }

    #[test]
    fn test_membership_rejects_invalid_role_on_decode() {
        let json = serde_json::json!({
            "id": Uuid::now_v7(),
            "organizationId": Uuid::now_v7(),
            "userId": Uuid::now_v7(),
            "role": "Owner",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        });

        assert!(serde_json::from_value::<OrgMembership>(json).is_err());
    }
}
