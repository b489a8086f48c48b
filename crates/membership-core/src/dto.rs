//! Read projections of memberships
//!
//! A snapshot joins a membership with the member's profile at read time. It is
//! derived data: nothing writes back through it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::membership::OrgMembership;

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 1440;
const MINUTES_PER_MONTH: i64 = 43800;
const MINUTES_PER_YEAR: i64 = 525600;

/// Profile fields for a user account, as provided by the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User ID
    pub id: Uuid,

    /// Login name
    pub login: String,

    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Avatar image URL
    #[serde(default)]
    pub avatar_url: String,

    /// Last time the user was active
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Creates a profile that has never been seen.
    pub fn new(
        id: Uuid,
        login: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            login: login.into(),
            email: email.into(),
            name: name.into(),
            avatar_url: String::new(),
            last_seen_at: None,
        }
    }

    /// Set the avatar URL.
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = url.into();
        self
    }

    /// Set the last-seen timestamp.
    pub fn with_last_seen_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_seen_at = Some(at);
        self
    }

    /// Check whether `login_or_email` names this user.
    pub fn matches_login_or_email(&self, login_or_email: &str) -> bool {
        self.login == login_or_email || self.email.eq_ignore_ascii_case(login_or_email)
    }
}

/// A membership joined with the member's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgMemberSnapshot {
    /// Organization ID
    pub org_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Avatar image URL
    pub avatar_url: String,

    /// Login name
    pub login: String,

    /// Canonical role string
    pub role: String,

    /// Last time the user was active
    pub last_seen_at: Option<DateTime<Utc>>,

    /// When the membership was last changed
    #[serde(skip)]
    pub updated: DateTime<Utc>,

    /// When the membership was created
    #[serde(skip)]
    pub created: DateTime<Utc>,

    /// Coarse age of `last_seen_at`, e.g. "3d"
    pub last_seen_at_age: String,

    /// What the acting user may do with this member, by action name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control: Option<HashMap<String, bool>>,
}

impl OrgMemberSnapshot {
    /// Build a snapshot from a membership and its user's profile.
    ///
    /// # Arguments
    ///
    /// * `membership` - The membership being projected
    /// * `profile` - The member's profile
    /// * `now` - Reference time for `last_seen_at_age`
    pub fn from_parts(
        membership: &OrgMembership,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            org_id: membership.organization_id,
            user_id: membership.user_id,
            email: profile.email.clone(),
            name: profile.name.clone(),
            avatar_url: profile.avatar_url.clone(),
            login: profile.login.clone(),
            role: membership.role.as_str().to_string(),
            last_seen_at: profile.last_seen_at,
            updated: membership.updated_at,
            created: membership.created_at,
            last_seen_at_age: age_string(profile.last_seen_at, now),
            access_control: None,
        }
    }

    /// Attach a capability map.
    pub fn with_access_control(mut self, access_control: HashMap<String, bool>) -> Self {
        self.access_control = Some(access_control);
        self
    }
}

/// Render the time since `then` as its largest whole unit.
///
/// Units are `y`, `M`, `d`, `h`, and `m`. Anything under a minute, including
/// timestamps in the future, is `"< 1m"`; an unknown timestamp is `"?"`.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use membership_core::dto::age_string;
///
/// let now = Utc::now();
/// assert_eq!(age_string(Some(now - Duration::hours(5)), now), "5h");
/// assert_eq!(age_string(None, now), "?");
/// ```
pub fn age_string(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(then) = then else {
        return "?".to_string();
    };

    let minutes = (now - then).num_minutes();
    let units = [
        (MINUTES_PER_YEAR, "y"),
        (MINUTES_PER_MONTH, "M"),
        (MINUTES_PER_DAY, "d"),
        (MINUTES_PER_HOUR, "h"),
        (1, "m"),
    ];

    units
        .iter()
        .map(|(size, suffix)| (minutes / size, suffix))
        .find(|(count, _)| *count > 0)
        .map(|(count, suffix)| format!("{count}{suffix}"))
        .unwrap_or_else(|| "< 1m".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;
    use chrono::Duration;

    #[test]
    fn test_age_string_units() {
        let now = Utc::now();

        assert_eq!(age_string(Some(now), now), "< 1m");
        assert_eq!(age_string(Some(now - Duration::seconds(30)), now), "< 1m");
        assert_eq!(age_string(Some(now - Duration::minutes(7)), now), "7m");
        assert_eq!(age_string(Some(now - Duration::hours(2)), now), "2h");
        assert_eq!(age_string(Some(now - Duration::days(3)), now), "3d");
        assert_eq!(age_string(Some(now - Duration::days(65)), now), "2M");
        assert_eq!(age_string(Some(now - Duration::days(800)), now), "2y");
    }

    #[test]
    fn test_age_string_future_and_unknown() {
        let now = Utc::now();

        assert_eq!(age_string(Some(now + Duration::hours(1)), now), "< 1m");
        assert_eq!(age_string(None, now), "?");
    }

    #[test]
    fn test_snapshot_from_parts() {
        let now = Utc::now();
        let membership = OrgMembership::new(Uuid::now_v7(), Uuid::now_v7(), Role::Editor);
        let profile = UserProfile::new(membership.user_id, "ada", "ada@example.com", "Ada")
            .with_last_seen_at(now - Duration::days(1));

        let snapshot = OrgMemberSnapshot::from_parts(&membership, &profile, now);

        assert_eq!(snapshot.org_id, membership.organization_id);
        assert_eq!(snapshot.role, "Editor");
        assert_eq!(snapshot.login, "ada");
        assert_eq!(snapshot.last_seen_at_age, "1d");
        assert!(snapshot.access_control.is_none());
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let membership = OrgMembership::new(Uuid::now_v7(), Uuid::now_v7(), Role::Viewer);
        let profile = UserProfile::new(membership.user_id, "bob", "bob@example.com", "Bob");
        let snapshot = OrgMemberSnapshot::from_parts(&membership, &profile, Utc::now());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["role"], "Viewer");
        assert_eq!(json["lastSeenAtAge"], "?");
        assert!(json.get("accessControl").is_none());
        assert!(json.get("updated").is_none());

        let mut access = HashMap::new();
        access.insert("org.users:read".to_string(), true);
        let json = serde_json::to_value(snapshot.with_access_control(access)).unwrap();
        assert_eq!(json["accessControl"]["org.users:read"], true);
    }

    #[test]
    fn test_profile_matches_login_or_email() {
        let profile = UserProfile::new(Uuid::now_v7(), "ada", "Ada@Example.com", "Ada");

        assert!(profile.matches_login_or_email("ada"));
        assert!(profile.matches_login_or_email("ada@example.com"));
        assert!(!profile.matches_login_or_email("ADA"));
    }
}
