// Scripted in-memory GitHub GraphQL backend for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use readme_stats::github::queries;
use readme_stats::github::{GraphQlRequest, GraphQlTransport};
use readme_stats::{Result, StatsError};
use serde_json::{Value, json};

pub const OWNER_ID: &str = "U_kgDOme";

/// Fake repository: identity, commit nodes of its default branch, stars.
#[derive(Debug, Clone)]
pub struct FakeRepo {
    pub name_with_owner: String,
    pub commits: Vec<Value>,
    pub stars: u64,
    pub empty: bool,
    /// Overrides the commit count reported during enumeration.
    pub reported_commits: Option<u64>,
}

impl FakeRepo {
    /// Repository whose target-user commits sum to the given totals,
    /// padded with commits the walker must ignore.
    pub fn with_loc(name_with_owner: &str, additions: u64, deletions: u64, my_commits: u64) -> Self {
        let mut commits = Vec::new();
        for i in 0..my_commits {
            let (a, d) = if i == 0 { (additions, deletions) } else { (0, 0) };
            commits.push(commit(a, d, Some(OWNER_ID), 1));
        }
        commits.push(commit(1_000, 1_000, Some("U_someone_else"), 1));
        commits.push(commit(500, 500, None, 1));
        commits.push(commit(250, 250, Some(OWNER_ID), 2));

        Self {
            name_with_owner: name_with_owner.to_string(),
            commits,
            stars: 1,
            empty: false,
            reported_commits: None,
        }
    }

    pub fn empty(name_with_owner: &str) -> Self {
        Self {
            name_with_owner: name_with_owner.to_string(),
            commits: Vec::new(),
            stars: 0,
            empty: true,
            reported_commits: None,
        }
    }

    /// Commit count reported by the enumeration query (the fingerprint).
    pub fn commit_count(&self) -> u64 {
        self.reported_commits.unwrap_or(self.commits.len() as u64)
    }

    pub fn reporting(mut self, commits: u64) -> Self {
        self.reported_commits = Some(commits);
        self
    }
}

pub fn commit(additions: u64, deletions: u64, author: Option<&str>, parents: u64) -> Value {
    json!({
        "additions": additions,
        "deletions": deletions,
        "parents": {"totalCount": parents},
        "author": {"user": author.map(|id| json!({"id": id}))},
    })
}

/// In-memory GitHub that records every request it serves.
pub struct FakeGitHub {
    pub repos: Vec<FakeRepo>,
    pub page_size: usize,
    pub followers: u64,
    pub created_at: &'static str,
    pub contributions_per_window: u64,
    /// Identity whose history walk fails with a 502.
    pub fail_walk: Option<String>,
    pub calls: Vec<(&'static str, Value)>,
}

impl FakeGitHub {
    pub fn new(repos: Vec<FakeRepo>) -> Self {
        Self {
            repos,
            page_size: 2,
            followers: 7,
            created_at: "2020-01-01T00:00:00Z",
            contributions_per_window: 10,
            fail_walk: None,
            calls: Vec::new(),
        }
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls.iter().filter(|(op, _)| *op == operation).count()
    }

    /// Repositories whose history walk started (first page requested).
    pub fn walked(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter(|(op, vars)| *op == queries::COMMIT_HISTORY_OP && vars["cursor"].is_null())
            .map(|(_, vars)| format!("{}/{}", vars["owner"].as_str().unwrap(), vars["name"].as_str().unwrap()))
            .collect()
    }

    pub fn reset_calls(&mut self) {
        self.calls.clear();
    }

    pub fn repo_mut(&mut self, name_with_owner: &str) -> &mut FakeRepo {
        self.repos
            .iter_mut()
            .find(|r| r.name_with_owner == name_with_owner)
            .unwrap()
    }

    fn page<T: Clone>(&self, items: &[T], cursor: &Value) -> (Vec<T>, Value, bool) {
        let start: usize = cursor.as_str().map_or(0, |c| c.parse().unwrap());
        let end = (start + self.page_size).min(items.len());
        let has_next = end < items.len();
        let next = if has_next { json!(end.to_string()) } else { Value::Null };
        (items[start..end].to_vec(), next, has_next)
    }

    fn repo_list(&self, vars: &Value) -> Value {
        let (repos, next, has_next) = self.page(&self.repos, &vars["cursor"]);
        let edges: Vec<Value> = repos
            .iter()
            .map(|r| {
                let branch = if r.empty {
                    Value::Null
                } else {
                    json!({"target": {"history": {"totalCount": r.commit_count()}}})
                };
                json!({"node": {"nameWithOwner": r.name_with_owner, "defaultBranchRef": branch}})
            })
            .collect();
        json!({"user": {"repositories": {
            "edges": edges,
            "pageInfo": {"endCursor": next, "hasNextPage": has_next}
        }}})
    }

    fn history(&self, vars: &Value) -> Result<Value> {
        let identity = format!(
            "{}/{}",
            vars["owner"].as_str().unwrap(),
            vars["name"].as_str().unwrap()
        );
        if self.fail_walk.as_deref() == Some(identity.as_str()) {
            return Err(StatsError::Http {
                status: 502,
                body: "Bad Gateway".to_string(),
            });
        }
        let Some(repo) = self.repos.iter().find(|r| r.name_with_owner == identity) else {
            return Ok(json!({"repository": null}));
        };
        if repo.empty {
            return Ok(json!({"repository": {"defaultBranchRef": null}}));
        }

        let (commits, next, has_next) = self.page(&repo.commits, &vars["cursor"]);
        let edges: Vec<Value> = commits.into_iter().map(|c| json!({"node": c})).collect();
        Ok(json!({"repository": {"defaultBranchRef": {"target": {"history": {
            "edges": edges,
            "pageInfo": {"endCursor": next, "hasNextPage": has_next}
        }}}}}))
    }

    fn repo_stats(&self, vars: &Value) -> Value {
        let owned_only = vars["affiliations"] == json!(["OWNER"]);
        let repos: Vec<FakeRepo> = self
            .repos
            .iter()
            .filter(|r| !owned_only || r.name_with_owner.starts_with("me/"))
            .cloned()
            .collect();
        let (page, next, has_next) = self.page(&repos, &vars["cursor"]);
        let edges: Vec<Value> = page
            .iter()
            .map(|r| json!({"node": {"stargazers": {"totalCount": r.stars}}}))
            .collect();
        json!({"user": {"repositories": {
            "totalCount": repos.len(),
            "edges": edges,
            "pageInfo": {"endCursor": next, "hasNextPage": has_next}
        }}})
    }
}

impl GraphQlTransport for FakeGitHub {
    async fn post(&mut self, request: GraphQlRequest<'_>) -> Result<Value> {
        self.calls.push((request.operation, request.variables.clone()));
        let vars = &request.variables;

        match request.operation {
            queries::REPO_LIST_OP => Ok(self.repo_list(vars)),
            queries::COMMIT_HISTORY_OP => self.history(vars),
            queries::REPO_STATS_OP => Ok(self.repo_stats(vars)),
            queries::USER_PROFILE_OP => Ok(json!({"user": {
                "id": OWNER_ID,
                "createdAt": self.created_at,
            }})),
            queries::FOLLOWERS_OP => Ok(json!({"user": {
                "followers": {"totalCount": self.followers}
            }})),
            queries::CONTRIBUTIONS_OP => Ok(json!({"user": {"contributionsCollection": {
                "contributionCalendar": {"totalContributions": self.contributions_per_window}
            }}})),
            other => Err(StatsError::Protocol(format!("unexpected operation {}", other))),
        }
    }
}
