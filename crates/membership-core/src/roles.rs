//! Organization roles
//!
//! This module defines the closed set of roles a member can hold within an
//! organization, the inclusion relation between them, and their canonical
//! string encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error returned when a string is not one of the canonical role spellings.
///
/// # Examples
///
/// ```
/// use membership_core::Role;
///
/// let err = "SuperAdmin".parse::<Role>().unwrap_err();
/// assert_eq!(err.raw, "SuperAdmin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid role value: {raw:?}")]
pub struct RoleDecodeError {
    /// The offending raw value
    pub raw: String,
}

/// User role within an organization.
///
/// The hierarchy, from most to least capable, is:
/// Admin > Editor > Viewer > Empty
///
/// # Permission Model
///
/// - **Admin**: Manages members and organization settings
/// - **Editor**: Creates and edits content
/// - **Viewer**: Read-only access
/// - **Empty**: No explicit role
///
/// # Examples
///
/// ```
/// use membership_core::Role;
///
/// assert!(Role::Admin.includes(Role::Editor));
/// assert!(!Role::Viewer.includes(Role::Editor));
/// assert_eq!(Role::Editor.children(), vec![Role::Viewer, Role::Empty]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// No explicit role
    #[default]
    Empty,

    /// Read-only access
    Viewer,

    /// Can create and edit content
    Editor,

    /// Full organization control
    Admin,
}

impl Role {
    /// Every role, most capable first.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Editor, Role::Viewer, Role::Empty];

    /// Check whether a raw string is one of the canonical role spellings.
    ///
    /// Matching is exact: case variants are invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_core::Role;
    ///
    /// assert!(Role::is_valid("Editor"));
    /// assert!(Role::is_valid(""));
    /// assert!(!Role::is_valid("editor"));
    /// ```
    pub fn is_valid(raw: &str) -> bool {
        raw.parse::<Role>().is_ok()
    }

    /// Check whether this role's capabilities are a superset of `other`'s.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_core::Role;
    ///
    /// assert!(Role::Viewer.includes(Role::Empty));
    /// assert!(!Role::Empty.includes(Role::Viewer));
    /// ```
    pub fn includes(&self, other: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Editor => other != Role::Admin,
            Role::Viewer => other == Role::Empty || *self == other,
            Role::Empty => *self == other,
        }
    }

    /// Get the strictly weaker roles below this one, most capable first.
    pub fn children(&self) -> Vec<Role> {
        match self {
            Role::Admin => vec![Role::Editor, Role::Viewer, Role::Empty],
            Role::Editor => vec![Role::Viewer, Role::Empty],
            Role::Viewer => vec![Role::Empty],
            Role::Empty => Vec::new(),
        }
    }

    /// Check if this role has admin privileges.
    pub fn is_admin(&self) -> bool {
        *self == Role::Admin
    }

    /// Get the canonical string representation of the role.
    ///
    /// # Examples
    ///
    /// ```
    /// use membership_core::Role;
    ///
    /// assert_eq!(Role::Admin.as_str(), "Admin");
    /// assert_eq!(Role::Empty.as_str(), "");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Empty => "",
            Role::Viewer => "Viewer",
            Role::Editor => "Editor",
            Role::Admin => "Admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Role::Empty),
            "Viewer" => Ok(Role::Viewer),
            "Editor" => Ok(Role::Editor),
            "Admin" => Ok(Role::Admin),
            _ => Err(RoleDecodeError { raw: s.to_string() }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_includes_is_reflexive() {
        for role in Role::ALL {
            assert!(role.includes(role), "{role:?} should include itself");
        }
    }

    #[test]
    fn test_admin_includes_everything() {
        for role in Role::ALL {
            assert!(Role::Admin.includes(role));
        }
    }

    #[test]
    fn test_includes_table() {
        assert!(Role::Editor.includes(Role::Viewer));
        assert!(Role::Editor.includes(Role::Empty));
        assert!(!Role::Editor.includes(Role::Admin));

        assert!(Role::Viewer.includes(Role::Empty));
        assert!(!Role::Viewer.includes(Role::Editor));
        assert!(!Role::Viewer.includes(Role::Admin));

        assert!(!Role::Empty.includes(Role::Viewer));
        assert!(!Role::Empty.includes(Role::Editor));
        assert!(!Role::Empty.includes(Role::Admin));
    }

    #[test]
    fn test_children() {
        assert_eq!(
            Role::Admin.children(),
            vec![Role::Editor, Role::Viewer, Role::Empty]
        );
        assert_eq!(Role::Editor.children(), vec![Role::Viewer, Role::Empty]);
        assert_eq!(Role::Viewer.children(), vec![Role::Empty]);
        assert!(Role::Empty.children().is_empty());
    }

    #[test]
    fn test_children_are_included_but_not_including() {
        for role in Role::ALL {
            for child in role.children() {
                assert!(role.includes(child));
                assert!(!child.includes(role));
            }
        }
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("".parse::<Role>(), Ok(Role::Empty));
        assert_eq!(
            "admin".parse::<Role>(),
            Err(RoleDecodeError {
                raw: "admin".to_string()
            })
        );
        assert!(!Role::is_valid("SuperAdmin"));
    }

    #[test]
    fn test_role_json_encoding() {
        let role: Role = serde_json::from_str("\"Admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"Admin\"");

        let empty: Role = serde_json::from_str("\"\"").unwrap();
        assert_eq!(empty, Role::Empty);
    }

    #[test]
    fn test_role_json_rejects_unknown_value() {
        let err = serde_json::from_str::<Role>("\"SuperAdmin\"").unwrap_err();
        assert!(err.to_string().contains("SuperAdmin"));
    }
}
