//! # Membership Access Control
//!
//! Member-management permissions derived from organization roles.
//!
//! ## Overview
//!
//! The membership-access crate handles:
//! - **Actions**: `org.users:read`, `org.users:add`, `org.users:write`, `org.users:remove`
//! - **Permissions**: An action, optionally scoped to one target user
//! - **Permission Sets**: What each role grants
//! - **Assignment**: Which roles a user may hand out
//! - **Capability Maps**: Per-member `accessControl` annotations for snapshots
//!
//! ## Architecture
//!
//! ```text
//! Permission = Action [+ target user]
//!
//! Examples:
//!   "org.users:read"                  - View every member
//!   "org.users:remove:<user uuid>"    - Remove one member
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use membership_access::{can_assign, MemberAction, Permission, PermissionSet};
//! use membership_core::Role;
//!
//! let set = PermissionSet::for_role(Role::Admin);
//! assert!(set.has(&Permission::new(MemberAction::Write)));
//!
//! assert!(!can_assign(Role::Editor, Role::Admin));
//! ```
//!
//! ## Action Implications
//!
//! `Add`, `Write`, and `Remove` each imply `Read`.

pub mod access;
pub mod actions;
pub mod assignment;
pub mod permissions;

// Re-export main types for convenience
pub use access::{access_control_map, annotate};
pub use actions::MemberAction;
pub use assignment::{assignable_roles, can_assign};
pub use permissions::{Permission, PermissionSet};
