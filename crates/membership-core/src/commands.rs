//! Membership command intents
//!
//! Commands are plain request values. They carry no behavior; enforcement
//! lives in [`MembershipGuard`](crate::MembershipGuard).
//!
//! Identifiers that come from the request path or the session rather than the
//! payload are skipped on the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::Role;

/// Add a user to an organization.
///
/// # Examples
///
/// ```
/// use membership_core::{AddMemberCommand, Role};
///
/// let cmd: AddMemberCommand =
///     serde_json::from_str(r#"{"loginOrEmail":"ada@example.com","role":"Editor"}"#).unwrap();
/// assert_eq!(cmd.role, Role::Editor);
/// assert!(cmd.organization_id.is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberCommand {
    /// Login or email of the user to add
    pub login_or_email: String,

    /// Role to grant
    pub role: Role,

    /// Target organization
    #[serde(skip)]
    pub organization_id: Uuid,
}

impl AddMemberCommand {
    /// Creates a new add-member command.
    pub fn new(organization_id: Uuid, login_or_email: impl Into<String>, role: Role) -> Self {
        Self {
            login_or_email: login_or_email.into(),
            role,
            organization_id,
        }
    }

    /// Set the target organization.
    pub fn with_organization(mut self, organization_id: Uuid) -> Self {
        self.organization_id = organization_id;
        self
    }
}

/// Change the role of an existing member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRoleCommand {
    /// New role
    pub role: Role,

    /// Target organization
    #[serde(skip)]
    pub organization_id: Uuid,

    /// Target user
    #[serde(skip)]
    pub user_id: Uuid,
}

impl UpdateMemberRoleCommand {
    /// Creates a new role-change command.
    pub fn new(organization_id: Uuid, user_id: Uuid, role: Role) -> Self {
        Self {
            role,
            organization_id,
            user_id,
        }
    }
}

/// Remove a member from an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberCommand {
    /// Target user
    pub user_id: Uuid,

    /// Target organization
    pub organization_id: Uuid,

    /// Delete the user account if this was its last membership
    #[serde(default)]
    pub should_delete_orphaned_user: bool,

    /// The user account is already gone; skip orphan cleanup
    #[serde(default)]
    pub user_was_deleted: bool,
}

impl RemoveMemberCommand {
    /// Creates a new removal command that keeps the user account.
    pub fn new(organization_id: Uuid, user_id: Uuid) -> Self {
        Self {
            user_id,
            organization_id,
            should_delete_orphaned_user: false,
            user_was_deleted: false,
        }
    }

    /// Request deletion of the user account once it belongs to no organization.
    pub fn delete_orphaned_user(mut self) -> Self {
        self.should_delete_orphaned_user = true;
        self
    }

    /// Mark the user account as already deleted by the caller.
    pub fn user_already_deleted(mut self) -> Self {
        self.user_was_deleted = true;
        self
    }
}
