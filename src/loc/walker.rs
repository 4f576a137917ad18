// Commit history walker.
// Pages through a repository's default-branch history and sums the target user's line changes.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::Result;
use crate::github::endpoints::{decode, next_cursor};
use crate::github::queries::{self, PAGE_SIZE};
use crate::github::types::{BranchRef, CommitNode, Connection, HistoryTarget};
use crate::github::{GraphQlRequest, GraphQlTransport};

use super::repo::RepositoryRef;

/// Line and commit counts attributed to one user in one repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocCounts {
    pub additions: u64,
    pub deletions: u64,
    pub commits: u64,
}

impl LocCounts {
    pub fn new(additions: u64, deletions: u64, commits: u64) -> Self {
        Self {
            additions,
            deletions,
            commits,
        }
    }

    /// Fold one commit in if it belongs to `owner_id`.
    fn add_commit(&mut self, commit: &CommitNode, owner_id: &str) {
        if commit.is_merge() || commit.author_id() != Some(owner_id) {
            return;
        }
        self.additions += commit.additions;
        self.deletions += commit.deletions;
        self.commits += 1;
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryData {
    repository: Option<HistoryRepo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRepo {
    default_branch_ref: Option<BranchRef<HistoryTarget<Connection<CommitNode>>>>,
}

/// Walk the full default-branch history of `repo`, counting commits authored by `owner_id`.
///
/// Repositories without a default branch, or that are no longer visible,
/// contribute nothing. Merge commits and commits without a linked account are
/// skipped.
pub async fn walk_history<T: GraphQlTransport>(
    transport: &mut T,
    repo: &RepositoryRef,
    owner_id: &str,
) -> Result<LocCounts> {
    let mut counts = LocCounts::default();
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let data = transport
            .post(GraphQlRequest::new(
                queries::COMMIT_HISTORY_OP,
                queries::COMMIT_HISTORY,
                json!({
                    "first": PAGE_SIZE,
                    "owner": repo.owner,
                    "name": repo.name,
                    "cursor": cursor,
                }),
            ))
            .await?;
        pages += 1;

        let data: HistoryData = decode(queries::COMMIT_HISTORY_OP, data)?;
        let Some(history) = data
            .repository
            .and_then(|r| r.default_branch_ref)
            .and_then(|b| b.target)
            .and_then(|t| t.history)
        else {
            break;
        };

        for edge in &history.edges {
            counts.add_commit(&edge.node, owner_id);
        }

        match next_cursor(queries::COMMIT_HISTORY_OP, &history.page_info)? {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    debug!(repo = %repo, pages, ?counts, "walked commit history");
    Ok(counts)
}
