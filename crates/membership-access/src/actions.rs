//! # Actions
//!
//! Defines the member-management actions a user can perform within an
//! organization.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on organization members.
///
/// - **Read**: View members and their roles
/// - **Add**: Add users to the organization
/// - **Write**: Change a member's role
/// - **Remove**: Remove members from the organization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MemberAction {
    /// View members.
    #[serde(rename = "org.users:read")]
    Read,

    /// Add a user to the organization.
    #[serde(rename = "org.users:add")]
    Add,

    /// Change a member's role.
    #[serde(rename = "org.users:write")]
    Write,

    /// Remove a member.
    #[serde(rename = "org.users:remove")]
    Remove,
}

impl MemberAction {
    /// Get the string representation of the action.
    ///
    /// # Example
    ///
    /// ```
    /// use membership_access::MemberAction;
    ///
    /// assert_eq!(MemberAction::Write.as_str(), "org.users:write");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberAction::Read => "org.users:read",
            MemberAction::Add => "org.users:add",
            MemberAction::Write => "org.users:write",
            MemberAction::Remove => "org.users:remove",
        }
    }

    /// Parse an action from its full name.
    ///
    /// # Returns
    ///
    /// `Some(MemberAction)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use membership_access::MemberAction;
    ///
    /// assert_eq!(MemberAction::parse("org.users:remove"), Some(MemberAction::Remove));
    /// assert_eq!(MemberAction::parse("remove"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().into_iter().find(|action| action.as_str() == s)
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            MemberAction::Read,
            MemberAction::Add,
            MemberAction::Write,
            MemberAction::Remove,
        ]
    }

    /// Check if this action implies another action.
    ///
    /// Every modifying action implies `Read`.
    pub fn implies(&self, other: MemberAction) -> bool {
        self.is_write() && other == MemberAction::Read
    }

    /// Check if this action modifies membership.
    pub fn is_write(&self) -> bool {
        !matches!(self, MemberAction::Read)
    }
}
