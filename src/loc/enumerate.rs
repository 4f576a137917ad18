// Repository enumeration for LOC accounting.
// Follows pagination cursors over the user's repositories, in API order.

use serde::Deserialize;
use serde_json::json;

use crate::error::Result;
use crate::github::endpoints::{decode, next_cursor};
use crate::github::queries::{self, PAGE_SIZE};
use crate::github::types::{Connection, RepoNode};
use crate::github::{Affiliation, GraphQlRequest, GraphQlTransport};

use super::repo::RepoEntry;

#[derive(Deserialize)]
struct RepoListData {
    user: Option<RepoListUser>,
}

#[derive(Deserialize)]
struct RepoListUser {
    repositories: Connection<RepoNode>,
}

/// List every repository matching `affiliations`, each with its commit-count fingerprint.
pub async fn enumerate_repositories<T: GraphQlTransport>(
    transport: &mut T,
    login: &str,
    affiliations: &[Affiliation],
) -> Result<Vec<RepoEntry>> {
    let mut entries = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let data = transport
            .post(GraphQlRequest::new(
                queries::REPO_LIST_OP,
                queries::REPO_LIST,
                json!({
                    "first": PAGE_SIZE,
                    "login": login,
                    "affiliations": affiliations,
                    "cursor": cursor,
                }),
            ))
            .await?;
        let data: RepoListData = decode(queries::REPO_LIST_OP, data)?;
        let Some(user) = data.user else {
            return Err(crate::error::StatsError::protocol(format!(
                "{}: user {} not found",
                queries::REPO_LIST_OP,
                login
            )));
        };
        let page = user.repositories;

        for edge in page.edges {
            let fingerprint = edge.node.commit_count();
            entries.push(RepoEntry {
                repo: edge.node.name_with_owner.parse()?,
                fingerprint,
            });
        }

        match next_cursor(queries::REPO_LIST_OP, &page.page_info)? {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(entries)
}
