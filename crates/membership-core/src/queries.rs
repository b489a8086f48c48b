//! Membership query intents and results

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::OrgMemberSnapshot;
use crate::roles::Role;

/// The user on whose behalf a query runs.
///
/// Used to annotate results with what that user may do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInUser {
    /// User ID
    pub user_id: Uuid,

    /// Organization the user is acting in
    pub organization_id: Uuid,

    /// The user's role in that organization
    pub role: Role,
}

/// List the members of an organization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersQuery {
    /// Organization to list
    pub organization_id: Uuid,

    /// Prefix filter over login, email, and name
    #[serde(default)]
    pub query: Option<String>,

    /// Maximum number of results
    #[serde(default)]
    pub limit: Option<usize>,

    /// Acting user, for capability annotation
    #[serde(skip)]
    pub acting_user: Option<SignedInUser>,
}

impl ListMembersQuery {
    /// Creates an unfiltered, unlimited listing.
    pub fn new(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            ..Self::default()
        }
    }

    /// Filter by login, email, or name prefix.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Cap the number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Annotate results for this user.
    pub fn acting_as(mut self, user: SignedInUser) -> Self {
        self.acting_user = Some(user);
        self
    }
}

/// Paginated member search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMembersQuery {
    /// Organization to search
    pub organization_id: Uuid,

    /// Prefix filter over login, email, and name
    #[serde(default)]
    pub query: Option<String>,

    /// 1-based page number
    #[serde(default)]
    pub page: Option<usize>,

    /// Page size
    #[serde(default)]
    pub per_page: Option<usize>,

    /// Acting user, for capability annotation
    #[serde(skip)]
    pub acting_user: Option<SignedInUser>,
}

impl SearchMembersQuery {
    /// Creates a search over the first page with the default page size.
    pub fn new(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            ..Self::default()
        }
    }

    /// Filter by login, email, or name prefix.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Select a page.
    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    /// Annotate results for this user.
    pub fn acting_as(mut self, user: SignedInUser) -> Self {
        self.acting_user = Some(user);
        self
    }
}

/// One page of member search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMembersResult {
    /// Matches across all pages
    pub total_count: usize,

    /// Matches on this page
    #[serde(rename = "OrgUsers")]
    pub org_users: Vec<OrgMemberSnapshot>,

    /// 1-based page number
    pub page: usize,

    /// Page size used
    pub per_page: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_wire_names() {
        let result = SearchMembersResult {
            total_count: 0,
            org_users: Vec::new(),
            page: 1,
            per_page: 50,
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "totalCount": 0, "OrgUsers": [], "page": 1, "perPage": 50 })
        );
    }

    #[test]
    fn test_list_query_builders() {
        let org_id = Uuid::now_v7();
        let query = ListMembersQuery::new(org_id).with_query("ad").with_limit(5);

        assert_eq!(query.organization_id, org_id);
        assert_eq!(query.query.as_deref(), Some("ad"));
        assert_eq!(query.limit, Some(5));
        assert!(query.acting_user.is_none());
    }
}
