//! # Membership Service
//!
//! Guarded organization membership operations on top of `membership-core`.
//!
//! ## Overview
//!
//! The membership-service crate handles:
//! - **Commands**: Add member, change role, remove member (with orphan cleanup)
//! - **Queries**: Filtered listing and paginated search of member snapshots
//! - **Seams**: `MembershipStore` and `UserDirectory` traits for real backends
//! - **Events**: Broadcast of persisted membership changes
//!
//! ## Features
//!
//! - `memory` (default): In-memory store and directory for single-process apps and tests
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "memory")]
//! # #[tokio::main]
//! # async fn main() {
//! use std::sync::Arc;
//! use membership_core::{AddMemberCommand, Role, UserProfile};
//! use membership_service::{InMemoryMembershipStore, InMemoryUserDirectory, MembershipService};
//! use uuid::Uuid;
//!
//! let directory = InMemoryUserDirectory::new();
//! directory
//!     .insert(UserProfile::new(Uuid::now_v7(), "ada", "ada@example.com", "Ada"))
//!     .await;
//!
//! let service = MembershipService::new(
//!     Arc::new(InMemoryMembershipStore::new()),
//!     Arc::new(directory),
//! );
//!
//! let org_id = Uuid::now_v7();
//! let membership = service
//!     .add_member(AddMemberCommand::new(org_id, "ada", Role::Admin))
//!     .await
//!     .unwrap();
//! assert_eq!(membership.role, Role::Admin);
//! # }
//! # #[cfg(not(feature = "memory"))]
//! # fn main() {}
//! ```
//!
//! ## Consistency
//!
//! Commands on one organization are serialized inside a service instance, and
//! orphaned account deletion is serialized with adds of the same user.
//! Several processes sharing one database need a store whose
//! `load_memberships`/`persist` pair runs in one transaction.

pub mod config;
pub mod error;
pub mod events;
mod locks;
#[cfg(feature = "memory")]
pub mod memory;
pub mod service;
pub mod store;

// Re-export main types for convenience
pub use config::{ConfigError, ServiceConfig};
pub use error::{ServiceError, ServiceResult, StoreError, StoreResult};
pub use events::MembershipEvent;
#[cfg(feature = "memory")]
pub use memory::{InMemoryMembershipStore, InMemoryUserDirectory};
pub use service::{MembershipService, RemovalOutcome};
pub use store::{MembershipMutation, MembershipStore, UserDirectory};
