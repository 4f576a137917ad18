// GitHub GraphQL response types.
// Defines structs for deserializing the `data` objects of the queries we issue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Relationship between the user and a repository, used to scope enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Affiliation {
    Owner,
    Collaborator,
    OrganizationMember,
}

impl Affiliation {
    /// Every affiliation, for "repositories I contributed to" style queries.
    pub const ALL: [Affiliation; 3] = [
        Affiliation::Owner,
        Affiliation::Collaborator,
        Affiliation::OrganizationMember,
    ];
}

/// Cursor pagination state of a connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

/// Single connection edge.
#[derive(Debug, Clone, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

/// Paginated connection response wrapper.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default)]
    pub total_count: Option<u64>,
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

/// `totalCount`-only connection.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}

/// Account identity and creation date.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate repository counters for a set of affiliations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoStats {
    pub repos: u64,
    pub stars: u64,
}

/// Repository node carrying only its stargazer count.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StarNode {
    pub stargazers: TotalCount,
}

/// Repository node as returned by the LOC enumeration query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepoNode {
    pub name_with_owner: String,
    pub default_branch_ref: Option<BranchRef<HistoryTarget<TotalCount>>>,
}

impl RepoNode {
    /// Commit count of the default branch; empty repositories report 0.
    pub fn commit_count(&self) -> u64 {
        self.default_branch_ref
            .as_ref()
            .and_then(|r| r.target.as_ref())
            .and_then(|t| t.history.as_ref())
            .map_or(0, |h| h.total_count)
    }
}

/// `defaultBranchRef` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BranchRef<T> {
    pub target: Option<T>,
}

/// `... on Commit { history }` fragment. Non-commit targets have no history.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HistoryTarget<H> {
    pub history: Option<H>,
}

/// Commit node within a default-branch history page.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommitNode {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    pub author: Option<CommitAuthor>,
    pub parents: Option<TotalCount>,
}

impl CommitNode {
    /// Stable account id of the author, if the commit is linked to an account.
    pub fn author_id(&self) -> Option<&str> {
        self.author
            .as_ref()
            .and_then(|a| a.user.as_ref())
            .map(|u| u.id.as_str())
    }

    pub fn is_merge(&self) -> bool {
        self.parents.is_some_and(|p| p.total_count > 1)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommitAuthor {
    pub user: Option<AccountId>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AccountId {
    pub id: String,
}

/// Rate limit information from response headers. `None` until a response reports it.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    pub reset: Option<u64>,
}

impl RateLimit {
    /// Whether the last response reported an empty quota.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Reset time formatted as wall-clock `HH:MM:SS` (UTC).
    pub fn reset_at(&self) -> String {
        self.reset
            .and_then(|reset| i64::try_from(reset).ok())
            .and_then(|reset| DateTime::from_timestamp(reset, 0))
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
