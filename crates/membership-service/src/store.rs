//! Storage and directory seams
//!
//! The service never talks to a database directly. It loads and writes
//! memberships through [`MembershipStore`] and looks users up through
//! [`UserDirectory`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use membership_core::{OrgMembership, Role, UserProfile};
use uuid::Uuid;

use crate::error::StoreResult;

/// A write to apply to the membership store.
#[derive(Debug, Clone, PartialEq)]
pub enum MembershipMutation {
    /// Create a membership
    Insert(OrgMembership),

    /// Replace a member's role
    UpdateRole {
        /// Organization ID
        organization_id: Uuid,
        /// User ID
        user_id: Uuid,
        /// New role
        role: Role,
        /// Timestamp of the change
        updated_at: DateTime<Utc>,
    },

    /// Delete a membership
    Delete {
        /// Organization ID
        organization_id: Uuid,
        /// User ID
        user_id: Uuid,
    },
}

impl MembershipMutation {
    /// Organization the mutation applies to.
    pub fn organization_id(&self) -> Uuid {
        match self {
            MembershipMutation::Insert(membership) => membership.organization_id,
            MembershipMutation::UpdateRole {
                organization_id, ..
            }
            | MembershipMutation::Delete {
                organization_id, ..
            } => *organization_id,
        }
    }
}

/// Persistent membership storage.
///
/// Implementations backed by a shared database must run
/// `load_memberships` and the following `persist` for one organization inside
/// a single transaction if more than one process writes memberships.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Load every membership of an organization.
    async fn load_memberships(&self, organization_id: Uuid) -> StoreResult<Vec<OrgMembership>>;

    /// Load every membership a user holds, across organizations.
    async fn memberships_for_user(&self, user_id: Uuid) -> StoreResult<Vec<OrgMembership>>;

    /// Apply a mutation.
    async fn persist(&self, mutation: MembershipMutation) -> StoreResult<()>;
}

/// User account lookup.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by login, or by email ignoring ASCII case.
    async fn resolve(&self, login_or_email: &str) -> StoreResult<Option<UserProfile>>;

    /// Get a user's profile.
    async fn profile(&self, user_id: Uuid) -> StoreResult<Option<UserProfile>>;

    /// Delete a user account.
    ///
    /// The service only calls this for accounts with no memberships left and
    /// serializes it with adds in the same process. Backends shared by several
    /// processes should refuse to delete a user who still has memberships.
    async fn delete_user(&self, user_id: Uuid) -> StoreResult<()>;
}
