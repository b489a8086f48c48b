//! # Role assignment
//!
//! Which roles a user may hand out. A user can grant their own role or any
//! role it includes, never a stronger one.

use membership_core::Role;

/// Roles the holder of `actor` may assign, strongest first.
///
/// # Example
///
/// ```
/// use membership_access::assignable_roles;
/// use membership_core::Role;
///
/// assert_eq!(assignable_roles(Role::Editor), vec![Role::Editor, Role::Viewer, Role::Empty]);
/// assert_eq!(assignable_roles(Role::Empty), vec![Role::Empty]);
/// ```
pub fn assignable_roles(actor: Role) -> Vec<Role> {
    let mut roles = vec![actor];
    roles.extend(actor.children());
    roles
}

/// Check whether the holder of `actor` may assign `target`.
pub fn can_assign(actor: Role, target: Role) -> bool {
    actor.includes(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignable_roles_agree_with_can_assign() {
        for actor in Role::ALL {
            let assignable = assignable_roles(actor);
            for target in Role::ALL {
                assert_eq!(
                    assignable.contains(&target),
                    can_assign(actor, target),
                    "{actor:?} -> {target:?}"
                );
            }
        }
    }

    #[test]
    fn test_editor_cannot_grant_admin() {
        assert!(!can_assign(Role::Editor, Role::Admin));
        assert!(can_assign(Role::Admin, Role::Admin));
    }
}
