//! # Permissions
//!
//! A permission is a member action, optionally scoped to one target user.
//! Permission sets are what a role grants.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use membership_core::Role;

use crate::actions::MemberAction;

/// A member action, optionally limited to one target user.
///
/// # Example
///
/// ```
/// use membership_access::{MemberAction, Permission};
/// use uuid::Uuid;
///
/// let perm = Permission::new(MemberAction::Read);
/// assert_eq!(perm.to_string(), "org.users:read");
///
/// let user_id = Uuid::nil();
/// let perm = Permission::for_user(MemberAction::Remove, user_id);
/// assert_eq!(perm.to_string(), format!("org.users:remove:{user_id}"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Permission {
    /// The action allowed.
    pub action: MemberAction,
    /// Optional: the only user this permission applies to.
    /// If None, applies to every member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl Permission {
    /// Create a permission covering every member.
    pub fn new(action: MemberAction) -> Self {
        Self {
            action,
            user_id: None,
        }
    }

    /// Create a permission for one target user.
    pub fn for_user(action: MemberAction, user_id: Uuid) -> Self {
        Self {
            action,
            user_id: Some(user_id),
        }
    }

    /// Get the string representation (e.g., "org.users:read" or "org.users:read:<uuid>").
    pub fn to_string(&self) -> String {
        match self.user_id {
            Some(id) => format!("{}:{}", self.action.as_str(), id),
            None => self.action.as_str().to_string(),
        }
    }

    /// Parse from string (e.g., "org.users:read" or "org.users:read:<uuid>").
    ///
    /// # Returns
    ///
    /// `Some(Permission)` if valid, `None` otherwise
    pub fn from_string(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, ':');
        let action = format!("{}:{}", parts.next()?, parts.next()?);
        let action = MemberAction::parse(&action)?;
        let user_id = match parts.next() {
            Some(id) => Some(Uuid::parse_str(id).ok()?),
            None => None,
        };

        Some(Self { action, user_id })
    }

    /// Check if this permission covers every member.
    pub fn is_global(&self) -> bool {
        self.user_id.is_none()
    }
}

/// A set of permissions granted to a role or user.
///
/// # Example
///
/// ```
/// use membership_access::{MemberAction, Permission, PermissionSet};
/// use membership_core::Role;
///
/// let set = PermissionSet::for_role(Role::Viewer);
/// assert!(set.has(&Permission::new(MemberAction::Read)));
/// assert!(!set.has(&Permission::new(MemberAction::Remove)));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    /// The permissions in this set (stored as strings).
    permissions: HashSet<String>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: HashSet::new(),
        }
    }

    /// Get the default member-management permissions for an organization role.
    ///
    /// - `Admin`: every action
    /// - `Editor`, `Viewer`: read
    /// - `Empty`: nothing
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Admin => MemberAction::all()
                .into_iter()
                .map(Permission::new)
                .collect(),
            Role::Editor | Role::Viewer => {
                [Permission::new(MemberAction::Read)].into_iter().collect()
            }
            Role::Empty => Self::new(),
        }
    }

    /// Add a permission to the set.
    pub fn add(&mut self, permission: Permission) {
        self.permissions.insert(permission.to_string());
    }

    /// Remove a permission from the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was present, `false` otherwise
    pub fn remove(&mut self, permission: &Permission) -> bool {
        self.permissions.remove(&permission.to_string())
    }

    /// Check if the set grants a permission.
    ///
    /// This checks for:
    /// 1. Exact match
    /// 2. Wildcard match (permission without user_id)
    /// 3. Implied match (e.g., Write implies Read)
    pub fn has(&self, permission: &Permission) -> bool {
        MemberAction::all()
            .into_iter()
            .filter(|action| *action == permission.action || action.implies(permission.action))
            .any(|action| {
                let scoped = Permission {
                    action,
                    user_id: permission.user_id,
                };
                self.permissions.contains(&scoped.to_string())
                    || self.permissions.contains(action.as_str())
            })
    }

    /// Get all permissions in the set.
    pub fn all(&self) -> Vec<Permission> {
        self.permissions
            .iter()
            .filter_map(|s| Permission::from_string(s))
            .collect()
    }

    /// Merge another permission set into this one.
    pub fn merge(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().cloned());
    }

    /// Get the count of permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        let mut set = PermissionSet::new();
        for perm in iter {
            set.add(perm);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_parsing() {
        let perm = Permission::from_string("org.users:read").unwrap();
        assert_eq!(perm.action, MemberAction::Read);
        assert!(perm.is_global());

        let user_id = Uuid::now_v7();
        let perm = Permission::from_string(&format!("org.users:write:{user_id}")).unwrap();
        assert_eq!(perm, Permission::for_user(MemberAction::Write, user_id));

        assert!(Permission::from_string("org.users").is_none());
        assert!(Permission::from_string("org.users:write:not-a-uuid").is_none());
        assert!(Permission::from_string("teams:read").is_none());
    }

    #[test]
    fn test_role_permission_sets() {
        let admin = PermissionSet::for_role(Role::Admin);
        for action in MemberAction::all() {
            assert!(admin.has(&Permission::new(action)));
        }

        for role in [Role::Editor, Role::Viewer] {
            let set = PermissionSet::for_role(role);
            assert!(set.has(&Permission::new(MemberAction::Read)));
            assert!(!set.has(&Permission::new(MemberAction::Add)));
            assert!(!set.has(&Permission::new(MemberAction::Write)));
        }

        assert!(PermissionSet::for_role(Role::Empty).is_empty());
    }

    #[test]
    fn test_global_permission_covers_specific_user() {
        let set = PermissionSet::for_role(Role::Viewer);
        assert!(set.has(&Permission::for_user(MemberAction::Read, Uuid::now_v7())));
    }

    #[test]
    fn test_scoped_permission_does_not_leak() {
        let target = Uuid::now_v7();
        let set: PermissionSet = [Permission::for_user(MemberAction::Write, target)]
            .into_iter()
            .collect();

        assert!(set.has(&Permission::for_user(MemberAction::Write, target)));
        assert!(set.has(&Permission::for_user(MemberAction::Read, target)));
        assert!(!set.has(&Permission::for_user(MemberAction::Write, Uuid::now_v7())));
        assert!(!set.has(&Permission::new(MemberAction::Write)));
    }

    #[test]
    fn test_permission_set_merge_and_remove() {
        let mut set = PermissionSet::for_role(Role::Viewer);
        set.merge(&[Permission::new(MemberAction::Add)].into_iter().collect());
        assert_eq!(set.len(), 2);

        assert!(set.remove(&Permission::new(MemberAction::Add)));
        assert!(!set.remove(&Permission::new(MemberAction::Add)));
        assert_eq!(set.all(), vec![Permission::new(MemberAction::Read)]);
    }
}
