//! # Organization Membership Core
//!
//! This crate models who belongs to an organization and with what role, and
//! enforces that every organization keeps at least one administrator.
//!
//! ## Overview
//!
//! The membership-core crate handles:
//! - **Roles**: The closed `Admin > Editor > Viewer > Empty` hierarchy
//! - **Memberships**: One user's role in one organization
//! - **Guard**: Pure checks that reject mutations breaking the admin invariant
//! - **Commands & Queries**: Request shapes for add, role change, removal, listing
//! - **Snapshots**: Read projections joining memberships with user profiles
//!
//! ## Architecture
//!
//! ```text
//! caller
//!   ├─ load memberships(org) ─→ [OrgMembership]
//!   ├─ MembershipGuard::check_*(memberships, command)
//!   │       └─ Role::includes / Role::is_admin
//!   └─ persist mutation (same atomic unit as the check)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use membership_core::{MembershipError, MembershipGuard, OrgMembership, Role};
//! use uuid::Uuid;
//!
//! let org_id = Uuid::now_v7();
//! let admin = OrgMembership::new(org_id, Uuid::now_v7(), Role::Admin);
//! let members = vec![admin.clone()];
//!
//! let guard = MembershipGuard::new();
//! assert_eq!(
//!     guard.check_role_change(&members, admin.user_id, Role::Viewer),
//!     Err(MembershipError::LastAdmin)
//! );
//! ```
//!
//! ## Concurrency
//!
//! Everything here is synchronous and free of shared state. The guard's
//! verdict is only valid if the caller applies the write in the same
//! per-organization transaction or lock scope it loaded the memberships in.

pub mod commands;
pub mod dto;
pub mod error;
pub mod guard;
pub mod membership;
pub mod queries;
pub mod roles;

// Re-export main types for convenience
pub use commands::{AddMemberCommand, RemoveMemberCommand, UpdateMemberRoleCommand};
pub use dto::{OrgMemberSnapshot, UserProfile};
pub use error::{MembershipError, MembershipResult};
pub use guard::MembershipGuard;
pub use membership::OrgMembership;
pub use queries::{ListMembersQuery, SearchMembersQuery, SearchMembersResult, SignedInUser};
pub use roles::{Role, RoleDecodeError};
