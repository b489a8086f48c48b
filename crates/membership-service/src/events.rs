//! Membership change events
//!
//! Broadcast after a mutation has been persisted.

use membership_core::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted membership change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// A user joined an organization
    MemberAdded {
        /// Organization ID
        organization_id: Uuid,
        /// User ID
        user_id: Uuid,
        /// Granted role
        role: Role,
    },

    /// A member's role changed
    RoleChanged {
        /// Organization ID
        organization_id: Uuid,
        /// User ID
        user_id: Uuid,
        /// Previous role
        from: Role,
        /// New role
        to: Role,
    },

    /// A member left an organization
    MemberRemoved {
        /// Organization ID
        organization_id: Uuid,
        /// User ID
        user_id: Uuid,
        /// Whether the user account was deleted as an orphan
        user_deleted: bool,
    },
}

impl MembershipEvent {
    /// Get the topic for this event.
    pub fn topic(&self) -> &'static str {
        match self {
            MembershipEvent::MemberAdded { .. } => "membership.added",
            MembershipEvent::RoleChanged { .. } => "membership.role_changed",
            MembershipEvent::MemberRemoved { .. } => "membership.removed",
        }
    }

    /// Organization the event belongs to.
    pub fn organization_id(&self) -> Uuid {
        match self {
            MembershipEvent::MemberAdded {
                organization_id, ..
            }
            | MembershipEvent::RoleChanged {
                organization_id, ..
            }
            | MembershipEvent::MemberRemoved {
                organization_id, ..
            } => *organization_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = MembershipEvent::RoleChanged {
            organization_id: Uuid::nil(),
            user_id: Uuid::nil(),
            from: Role::Admin,
            to: Role::Viewer,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "role_changed");
        assert_eq!(json["from"], "Admin");
        assert_eq!(json["to"], "Viewer");
        assert_eq!(event.topic(), "membership.role_changed");
    }
}
