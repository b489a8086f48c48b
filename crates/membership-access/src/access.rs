//! # Capability maps
//!
//! Per-member capability maps for read projections: for each action, whether
//! the acting user may perform it on that member.

use std::collections::HashMap;

use membership_core::OrgMemberSnapshot;
use uuid::Uuid;

use crate::actions::MemberAction;
use crate::permissions::{Permission, PermissionSet};

/// Build the capability map of `permissions` over one target member.
///
/// Every action appears in the map, granted or not.
///
/// # Example
///
/// ```
/// use membership_access::{access_control_map, PermissionSet};
/// use membership_core::Role;
/// use uuid::Uuid;
///
/// let map = access_control_map(&PermissionSet::for_role(Role::Viewer), Uuid::now_v7());
/// assert_eq!(map["org.users:read"], true);
/// assert_eq!(map["org.users:remove"], false);
/// ```
pub fn access_control_map(permissions: &PermissionSet, target: Uuid) -> HashMap<String, bool> {
    MemberAction::all()
        .into_iter()
        .map(|action| {
            let granted = permissions.has(&Permission::for_user(action, target));
            (action.as_str().to_string(), granted)
        })
        .collect()
}

/// Attach the capability map for `snapshot`'s member.
pub fn annotate(snapshot: OrgMemberSnapshot, permissions: &PermissionSet) -> OrgMemberSnapshot {
    let map = access_control_map(permissions, snapshot.user_id);
    snapshot.with_access_control(map)
}
