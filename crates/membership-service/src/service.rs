//! Membership service
//!
//! Runs membership commands against a store: load the organization's
//! memberships, ask the guard, then persist. Each of those sequences holds a
//! per-organization lock, so two commands on the same organization cannot both
//! pass the last-admin check against the same snapshot.
//!
//! Adding a user and deleting an orphaned account also hold a per-user lock,
//! taken after the organization lock, so an account is never deleted while a
//! membership for it is being created elsewhere.

use std::sync::Arc;

use chrono::Utc;
use membership_access::{annotate, PermissionSet};
use membership_core::{
    AddMemberCommand, ListMembersQuery, MembershipGuard, OrgMemberSnapshot, OrgMembership,
    RemoveMemberCommand, SearchMembersQuery, SearchMembersResult, SignedInUser,
    UpdateMemberRoleCommand,
};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{ConfigError, ServiceConfig};
use crate::error::{ServiceError, ServiceResult};
use crate::events::MembershipEvent;
use crate::locks::KeyedLocks;
use crate::store::{MembershipMutation, MembershipStore, UserDirectory};

/// Result of a member removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// The user account no longer exists, either because the caller said so
    /// or because it was deleted as an orphan.
    pub user_was_deleted: bool,
}

/// Guarded membership operations over a store and a user directory.
pub struct MembershipService<S, D> {
    store: Arc<S>,
    directory: Arc<D>,
    guard: MembershipGuard,
    config: ServiceConfig,
    org_locks: KeyedLocks,
    user_locks: KeyedLocks,
    events: broadcast::Sender<MembershipEvent>,
}

impl<S, D> std::fmt::Debug for MembershipService<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipService")
            .field("config", &self.config)
            .finish()
    }
}

impl<S, D> MembershipService<S, D>
where
    S: MembershipStore,
    D: UserDirectory,
{
    /// Create a service with default configuration.
    pub fn new(store: Arc<S>, directory: Arc<D>) -> Self {
        Self::build(store, directory, ServiceConfig::default())
    }

    /// Create a service with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the configuration fails
    /// [`ServiceConfig::validate`].
    pub fn with_config(
        store: Arc<S>,
        directory: Arc<D>,
        config: ServiceConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(store, directory, config))
    }

    fn build(store: Arc<S>, directory: Arc<D>, config: ServiceConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            store,
            directory,
            guard: MembershipGuard::new(),
            config,
            org_locks: KeyedLocks::new(),
            user_locks: KeyedLocks::new(),
            events,
        }
    }

    /// Subscribe to membership events persisted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.events.subscribe()
    }

    /// Add a user to an organization.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no user matches the login or email
    /// - `AlreadyMember` if the user already belongs to the organization
    #[instrument(skip_all, fields(organization_id = %cmd.organization_id))]
    pub async fn add_member(&self, cmd: AddMemberCommand) -> ServiceResult<OrgMembership> {
        let profile = self
            .directory
            .resolve(&cmd.login_or_email)
            .await?
            .ok_or_else(|| ServiceError::UserNotFound(cmd.login_or_email.clone()))?;

        let _org_lock = self.org_locks.lock(cmd.organization_id).await;
        let _user_lock = self.user_locks.lock(profile.id).await;

        // The account may have been deleted as an orphan since it was resolved.
        if self.directory.profile(profile.id).await?.is_none() {
            warn!(user_id = %profile.id, "User deleted before membership was added");
            return Err(ServiceError::UserNotFound(cmd.login_or_email));
        }

        let members = self.store.load_memberships(cmd.organization_id).await?;
        if let Err(err) = self.guard.check_add(&members, profile.id) {
            warn!(user_id = %profile.id, error = %err, "Rejected member add");
            return Err(err.into());
        }

        let membership = OrgMembership::new(cmd.organization_id, profile.id, cmd.role);
        self.store
            .persist(MembershipMutation::Insert(membership.clone()))
            .await?;

        info!(user_id = %profile.id, role = %cmd.role, "Member added");
        self.publish(MembershipEvent::MemberAdded {
            organization_id: cmd.organization_id,
            user_id: profile.id,
            role: cmd.role,
        });

        Ok(membership)
    }

    /// Change a member's role.
    ///
    /// # Errors
    ///
    /// - `MembershipNotFound` if the user is not a member
    /// - `LastAdmin` if this would demote the organization's only admin
    #[instrument(skip_all, fields(organization_id = %cmd.organization_id, user_id = %cmd.user_id))]
    pub async fn update_member_role(&self, cmd: UpdateMemberRoleCommand) -> ServiceResult<()> {
        let _org_lock = self.org_locks.lock(cmd.organization_id).await;
        let members = self.store.load_memberships(cmd.organization_id).await?;

        if let Err(err) = self
            .guard
            .check_role_change(&members, cmd.user_id, cmd.role)
        {
            warn!(role = %cmd.role, error = %err, "Rejected role change");
            return Err(err.into());
        }
        let previous = members
            .iter()
            .find(|m| m.user_id == cmd.user_id)
            .map(|m| m.role)
            .unwrap_or_default();

        self.store
            .persist(MembershipMutation::UpdateRole {
                organization_id: cmd.organization_id,
                user_id: cmd.user_id,
                role: cmd.role,
                updated_at: Utc::now(),
            })
            .await?;

        info!(from = %previous, to = %cmd.role, "Member role changed");
        self.publish(MembershipEvent::RoleChanged {
            organization_id: cmd.organization_id,
            user_id: cmd.user_id,
            from: previous,
            to: cmd.role,
        });

        Ok(())
    }

    /// Remove a member, optionally deleting the account if it is left
    /// without any organization.
    ///
    /// The orphan cleanup relies on the removal having passed the
    /// last-admin check and does not check again. It runs after the removal
    /// is persisted: if it fails, the failure is logged and the outcome
    /// reports the account as not deleted.
    ///
    /// # Errors
    ///
    /// - `MembershipNotFound` if the user is not a member
    /// - `LastAdmin` if the user is the organization's only admin
    #[instrument(skip_all, fields(organization_id = %cmd.organization_id, user_id = %cmd.user_id))]
    pub async fn remove_member(&self, cmd: RemoveMemberCommand) -> ServiceResult<RemovalOutcome> {
        let _org_lock = self.org_locks.lock(cmd.organization_id).await;
        let members = self.store.load_memberships(cmd.organization_id).await?;

        if let Err(err) = self.guard.check_removal(&members, cmd.user_id) {
            warn!(error = %err, "Rejected member removal");
            return Err(err.into());
        }

        self.store
            .persist(MembershipMutation::Delete {
                organization_id: cmd.organization_id,
                user_id: cmd.user_id,
            })
            .await?;

        let user_was_deleted = if cmd.should_delete_orphaned_user && !cmd.user_was_deleted {
            self.delete_if_orphaned(cmd.user_id).await
        } else {
            cmd.user_was_deleted
        };

        info!("Member removed");
        self.publish(MembershipEvent::MemberRemoved {
            organization_id: cmd.organization_id,
            user_id: cmd.user_id,
            user_deleted: user_was_deleted,
        });

        Ok(RemovalOutcome { user_was_deleted })
    }

    /// List an organization's members.
    ///
    /// A limit of zero means no limit.
    #[instrument(skip_all, fields(organization_id = %query.organization_id))]
    pub async fn list_members(
        &self,
        query: ListMembersQuery,
    ) -> ServiceResult<Vec<OrgMemberSnapshot>> {
        let mut snapshots = self
            .matching_snapshots(query.organization_id, query.query.as_deref())
            .await?;

        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            snapshots.truncate(limit);
        }

        debug!(count = snapshots.len(), "Listed members");
        Ok(self.annotate_all(snapshots, query.organization_id, query.acting_user.as_ref()))
    }

    /// Search an organization's members one page at a time.
    ///
    /// Pages are 1-based. The page size falls back to the configured default
    /// and is capped at the configured maximum.
    #[instrument(skip_all, fields(organization_id = %query.organization_id))]
    pub async fn search_members(
        &self,
        query: SearchMembersQuery,
    ) -> ServiceResult<SearchMembersResult> {
        let snapshots = self
            .matching_snapshots(query.organization_id, query.query.as_deref())
            .await?;

        let page = query.page.filter(|page| *page > 0).unwrap_or(1);
        let per_page = query
            .per_page
            .filter(|per_page| *per_page > 0)
            .unwrap_or(self.config.default_per_page)
            .min(self.config.max_per_page);
        let total_count = snapshots.len();

        let page_items: Vec<_> = snapshots
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        debug!(total_count, page, per_page, "Searched members");
        let org_users =
            self.annotate_all(page_items, query.organization_id, query.acting_user.as_ref());
        Ok(SearchMembersResult {
            total_count,
            org_users,
            page,
            per_page,
        })
    }

    /// Load, filter, and order the organization's member snapshots.
    async fn matching_snapshots(
        &self,
        organization_id: Uuid,
        filter: Option<&str>,
    ) -> ServiceResult<Vec<OrgMemberSnapshot>> {
        let members = self.store.load_memberships(organization_id).await?;
        let filter = filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase);
        let now = Utc::now();

        let mut snapshots = Vec::with_capacity(members.len());
        for membership in &members {
            let Some(profile) = self.directory.profile(membership.user_id).await? else {
                warn!(user_id = %membership.user_id, "Membership references unknown user");
                continue;
            };

            let matches = filter.as_deref().map_or(true, |prefix| {
                [&profile.login, &profile.email, &profile.name]
                    .iter()
                    .any(|field| field.to_lowercase().starts_with(prefix))
            });
            if matches {
                snapshots.push(OrgMemberSnapshot::from_parts(membership, &profile, now));
            }
        }

        snapshots.sort_by(|a, b| a.email.cmp(&b.email).then_with(|| a.login.cmp(&b.login)));
        Ok(snapshots)
    }

    fn annotate_all(
        &self,
        snapshots: Vec<OrgMemberSnapshot>,
        organization_id: Uuid,
        acting_user: Option<&SignedInUser>,
    ) -> Vec<OrgMemberSnapshot> {
        let Some(user) = acting_user else {
            return snapshots;
        };

        // A role held in another organization grants nothing here.
        let permissions = if user.organization_id == organization_id {
            PermissionSet::for_role(user.role)
        } else {
            PermissionSet::new()
        };

        snapshots
            .into_iter()
            .map(|snapshot| annotate(snapshot, &permissions))
            .collect()
    }

    /// Delete the account if it no longer belongs to any organization.
    ///
    /// Returns whether the account was deleted. Failures are logged, never
    /// returned, because the removal they follow is already persisted.
    async fn delete_if_orphaned(&self, user_id: Uuid) -> bool {
        let _user_lock = self.user_locks.lock(user_id).await;

        match self.try_delete_orphan(user_id).await {
            Ok(deleted) => deleted,
            Err(err) => {
                warn!(error = %err, "Orphaned user cleanup failed");
                false
            }
        }
    }

    async fn try_delete_orphan(&self, user_id: Uuid) -> ServiceResult<bool> {
        if !self.store.memberships_for_user(user_id).await?.is_empty() {
            return Ok(false);
        }

        self.directory.delete_user(user_id).await?;
        info!("Deleted orphaned user account");
        Ok(true)
    }

    fn publish(&self, event: MembershipEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::error::StoreResult;
    use crate::memory::{InMemoryMembershipStore, InMemoryUserDirectory};
    use async_trait::async_trait;
    use membership_core::{MembershipError, Role, UserProfile};

    /// Directory that still resolves a login after the account is gone.
    struct StaleDirectory(InMemoryUserDirectory);

    #[async_trait]
    impl UserDirectory for StaleDirectory {
        async fn resolve(&self, login_or_email: &str) -> StoreResult<Option<UserProfile>> {
            self.0.resolve(login_or_email).await
        }

        async fn profile(&self, _user_id: Uuid) -> StoreResult<Option<UserProfile>> {
            Ok(None)
        }

        async fn delete_user(&self, user_id: Uuid) -> StoreResult<()> {
            self.0.delete_user(user_id).await
        }
    }

    async fn service_with(
        roles: &[Role],
    ) -> (
        MembershipService<InMemoryMembershipStore, InMemoryUserDirectory>,
        Uuid,
        Vec<Uuid>,
    ) {
        let org_id = Uuid::now_v7();
        let directory = InMemoryUserDirectory::new();
        let mut user_ids = Vec::new();
        let mut memberships = Vec::new();

        for (i, role) in roles.iter().enumerate() {
            let user_id = Uuid::now_v7();
            directory
                .insert(UserProfile::new(
                    user_id,
                    format!("user{i}"),
                    format!("user{i}@example.com"),
                    format!("User {i}"),
                ))
                .await;
            memberships.push(OrgMembership::new(org_id, user_id, *role));
            user_ids.push(user_id);
        }

        let store = InMemoryMembershipStore::with_memberships(memberships);
        let service = MembershipService::new(Arc::new(store), Arc::new(directory));
        (service, org_id, user_ids)
    }

    #[tokio::test]
    async fn test_remove_last_admin_is_rejected_and_state_unchanged() {
        let (service, org_id, users) = service_with(&[Role::Admin, Role::Viewer]).await;

        let err = service
            .remove_member(RemoveMemberCommand::new(org_id, users[0]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Membership(MembershipError::LastAdmin)
        ));

        let members = service.store.load_memberships(org_id).await.unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_events_are_published_after_persisting() {
        let (service, org_id, users) = service_with(&[Role::Admin, Role::Viewer]).await;
        let mut events = service.subscribe();

        service
            .update_member_role(UpdateMemberRoleCommand::new(org_id, users[1], Role::Editor))
            .await
            .unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            MembershipEvent::RoleChanged {
                organization_id: org_id,
                user_id: users[1],
                from: Role::Viewer,
                to: Role::Editor,
            }
        );
    }

    #[tokio::test]
    async fn test_rejected_mutation_publishes_nothing() {
        let (service, org_id, users) = service_with(&[Role::Admin]).await;
        let mut events = service.subscribe();

        let result = service
            .update_member_role(UpdateMemberRoleCommand::new(org_id, users[0], Role::Viewer))
            .await;
        assert!(result.is_err());
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_acting_user_from_other_org_gets_no_capabilities() {
        let (service, org_id, users) = service_with(&[Role::Admin]).await;
        let outsider = SignedInUser {
            user_id: users[0],
            organization_id: Uuid::now_v7(),
            role: Role::Admin,
        };

        let snapshots = service
            .list_members(ListMembersQuery::new(org_id).acting_as(outsider))
            .await
            .unwrap();

        let access = snapshots[0].access_control.as_ref().unwrap();
        assert!(access.values().all(|granted| !*granted));
    }

    #[tokio::test]
    async fn test_locks_released_after_commands() {
        let (service, org_id, users) = service_with(&[Role::Admin, Role::Viewer]).await;

        for _ in 0..100 {
            let result = service
                .remove_member(RemoveMemberCommand::new(Uuid::now_v7(), users[0]))
                .await;
            assert!(result.is_err());
        }
        service
            .remove_member(RemoveMemberCommand::new(org_id, users[1]).delete_orphaned_user())
            .await
            .unwrap();

        assert_eq!(service.org_locks.len(), 0);
        assert_eq!(service.user_locks.len(), 0);
    }

    #[tokio::test]
    async fn test_add_rejects_user_deleted_after_resolve() {
        let directory = InMemoryUserDirectory::new();
        directory
            .insert(UserProfile::new(Uuid::now_v7(), "ada", "ada@example.com", "Ada"))
            .await;
        let store = Arc::new(InMemoryMembershipStore::new());
        let service = MembershipService::new(store.clone(), Arc::new(StaleDirectory(directory)));
        let org_id = Uuid::now_v7();

        let err = service
            .add_member(AddMemberCommand::new(org_id, "ada", Role::Viewer))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::UserNotFound(ref login) if login == "ada"));
        assert!(store.load_memberships(org_id).await.unwrap().is_empty());
    }

    #[test]
    fn test_with_config_rejects_invalid_config() {
        let store = Arc::new(InMemoryMembershipStore::new());
        let directory = Arc::new(InMemoryUserDirectory::new());

        let default_above_max = ServiceConfig {
            default_per_page: 50,
            max_per_page: 10,
            event_capacity: 16,
        };
        assert!(matches!(
            MembershipService::with_config(store.clone(), directory.clone(), default_above_max),
            Err(ConfigError::InvalidValue { key, .. }) if key == "MEMBERSHIP_DEFAULT_PER_PAGE"
        ));

        let zero_max = ServiceConfig {
            max_per_page: 0,
            ..ServiceConfig::default()
        };
        assert!(MembershipService::with_config(store, directory, zero_max).is_err());
    }
}
