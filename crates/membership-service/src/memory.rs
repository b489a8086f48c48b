//! In-memory store and directory
//!
//! Suitable for single-process applications and testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use membership_core::{OrgMembership, UserProfile};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{MembershipMutation, MembershipStore, UserDirectory};

/// In-memory membership store keyed by organization.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipStore {
    organizations: Arc<RwLock<HashMap<Uuid, Vec<OrgMembership>>>>,
}

impl InMemoryMembershipStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `memberships`.
    pub fn with_memberships(memberships: impl IntoIterator<Item = OrgMembership>) -> Self {
        let mut organizations: HashMap<Uuid, Vec<OrgMembership>> = HashMap::new();
        for membership in memberships {
            organizations
                .entry(membership.organization_id)
                .or_default()
                .push(membership);
        }

        Self {
            organizations: Arc::new(RwLock::new(organizations)),
        }
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn load_memberships(&self, organization_id: Uuid) -> StoreResult<Vec<OrgMembership>> {
        let organizations = self.organizations.read().await;
        Ok(organizations
            .get(&organization_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn memberships_for_user(&self, user_id: Uuid) -> StoreResult<Vec<OrgMembership>> {
        let organizations = self.organizations.read().await;
        Ok(organizations
            .values()
            .flatten()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn persist(&self, mutation: MembershipMutation) -> StoreResult<()> {
        let mut organizations = self.organizations.write().await;
        let organization_id = mutation.organization_id();

        match mutation {
            MembershipMutation::Insert(membership) => {
                let members = organizations.entry(organization_id).or_default();
                if members.iter().any(|m| m.user_id == membership.user_id) {
                    return Err(StoreError::Conflict(format!(
                        "membership for user {} already exists",
                        membership.user_id
                    )));
                }
                members.push(membership);
            }
            MembershipMutation::UpdateRole {
                user_id,
                role,
                updated_at,
                ..
            } => {
                let membership = organizations
                    .get_mut(&organization_id)
                    .and_then(|members| members.iter_mut().find(|m| m.user_id == user_id))
                    .ok_or_else(|| membership_not_found(user_id))?;
                membership.role = role;
                membership.updated_at = updated_at;
            }
            MembershipMutation::Delete { user_id, .. } => {
                let members = organizations
                    .get_mut(&organization_id)
                    .ok_or_else(|| membership_not_found(user_id))?;
                let before = members.len();
                members.retain(|m| m.user_id != user_id);
                if members.len() == before {
                    return Err(membership_not_found(user_id));
                }
                if members.is_empty() {
                    organizations.remove(&organization_id);
                }
            }
        }

        Ok(())
    }
}

fn membership_not_found(user_id: Uuid) -> StoreError {
    StoreError::NotFound(format!("membership for user {user_id}"))
}

/// In-memory user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<Uuid, UserProfile>>>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user.
    pub async fn insert(&self, profile: UserProfile) {
        self.users.write().await.insert(profile.id, profile);
    }

    /// Check whether a user account exists.
    pub async fn contains(&self, user_id: Uuid) -> bool {
        self.users.read().await.contains_key(&user_id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn resolve(&self, login_or_email: &str) -> StoreResult<Option<UserProfile>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.matches_login_or_email(login_or_email))
            .cloned())
    }

    async fn profile(&self, user_id: Uuid) -> StoreResult<Option<UserProfile>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn delete_user(&self, user_id: Uuid) -> StoreResult<()> {
        self.users
            .write()
            .await
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))
    }
}
