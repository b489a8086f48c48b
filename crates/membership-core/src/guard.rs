//! Last-admin invariant guard
//!
//! The guard decides whether a proposed membership mutation may be applied to
//! an organization. It works on a snapshot of the organization's memberships
//! and never mutates it, so every rejection leaves the set unchanged.
//!
//! The check only holds if the caller runs it and the resulting write inside
//! one atomic unit per organization; the guard cannot see removals committed
//! after its snapshot was read.

use uuid::Uuid;

use crate::error::{MembershipError, MembershipResult};
use crate::membership::OrgMembership;
use crate::roles::Role;

/// Stateless checker for membership mutations.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use membership_core::{MembershipError, MembershipGuard, OrgMembership, Role};
///
/// let org_id = Uuid::now_v7();
/// let admin = OrgMembership::new(org_id, Uuid::now_v7(), Role::Admin);
/// let viewer = OrgMembership::new(org_id, Uuid::now_v7(), Role::Viewer);
/// let members = vec![admin.clone(), viewer.clone()];
///
/// let guard = MembershipGuard::new();
/// assert_eq!(guard.check_removal(&members, admin.user_id), Err(MembershipError::LastAdmin));
/// assert!(guard.check_removal(&members, viewer.user_id).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipGuard;

impl MembershipGuard {
    /// Creates a new guard.
    pub fn new() -> Self {
        Self
    }

    /// Check whether `user_id` may be removed from the organization.
    ///
    /// # Errors
    ///
    /// - `MembershipNotFound` if the user is not a member
    /// - `LastAdmin` if the user is the organization's only admin
    pub fn check_removal(
        &self,
        memberships: &[OrgMembership],
        user_id: Uuid,
    ) -> MembershipResult<()> {
        let target = find(memberships, user_id)?;
        if target.is_admin() && remaining_admins(memberships, user_id) == 0 {
            return Err(MembershipError::LastAdmin);
        }
        Ok(())
    }

    /// Check whether `user_id` may be moved to `new_role`.
    ///
    /// # Errors
    ///
    /// - `MembershipNotFound` if the user is not a member
    /// - `LastAdmin` if the user is the only admin and `new_role` is not admin
    pub fn check_role_change(
        &self,
        memberships: &[OrgMembership],
        user_id: Uuid,
        new_role: Role,
    ) -> MembershipResult<()> {
        let target = find(memberships, user_id)?;
        if target.is_admin() && !new_role.is_admin() && remaining_admins(memberships, user_id) == 0
        {
            return Err(MembershipError::LastAdmin);
        }
        Ok(())
    }

    /// Check whether `user_id` may be added to the organization.
    ///
    /// Adding never threatens the admin invariant.
    ///
    /// # Errors
    ///
    /// - `AlreadyMember` if the user already has a membership
    pub fn check_add(&self, memberships: &[OrgMembership], user_id: Uuid) -> MembershipResult<()> {
        if memberships.iter().any(|m| m.user_id == user_id) {
            return Err(MembershipError::AlreadyMember { user_id });
        }
        Ok(())
    }
}

fn find(memberships: &[OrgMembership], user_id: Uuid) -> MembershipResult<&OrgMembership> {
    memberships
        .iter()
        .find(|m| m.user_id == user_id)
        .ok_or(MembershipError::MembershipNotFound { user_id })
}

/// Admins left once `excluded` is taken out of the count.
fn remaining_admins(memberships: &[OrgMembership], excluded: Uuid) -> usize {
    memberships
        .iter()
        .filter(|m| m.user_id != excluded && m.is_admin())
        .count()
}
