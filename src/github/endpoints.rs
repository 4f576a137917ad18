// GitHub account statistics queries.
// Typed wrappers over the GraphQL transport for profile, follower, repository, and contribution counts.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{Result, StatsError};

use super::client::{GraphQlRequest, GraphQlTransport};
use super::queries::{self, PAGE_SIZE};
use super::types::{Affiliation, Connection, RepoStats, StarNode, TotalCount, UserProfile};

/// Longest range the contributions API accepts in a single request.
const MAX_CONTRIBUTION_WINDOW_DAYS: i64 = 365;

/// Decode a fragment of a `data` object, reporting shape mismatches as protocol errors.
pub(crate) fn decode<T: DeserializeOwned>(operation: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| StatsError::protocol(format!("{}: unexpected response shape: {}", operation, e)))
}

/// Take `data.user`, failing when the login does not resolve.
fn user_field(operation: &str, mut data: Value) -> Result<Value> {
    match data.get_mut("user").map(Value::take) {
        Some(Value::Null) | None => Err(StatsError::protocol(format!(
            "{}: user not found",
            operation
        ))),
        Some(user) => Ok(user),
    }
}

/// Get the account id and creation date for a login.
pub async fn user_profile<T: GraphQlTransport>(transport: &mut T, login: &str) -> Result<UserProfile> {
    let data = transport
        .post(GraphQlRequest::new(
            queries::USER_PROFILE_OP,
            queries::USER_PROFILE,
            json!({ "login": login }),
        ))
        .await?;
    decode(queries::USER_PROFILE_OP, user_field(queries::USER_PROFILE_OP, data)?)
}

/// Get the follower count for a login.
pub async fn follower_count<T: GraphQlTransport>(transport: &mut T, login: &str) -> Result<u64> {
    #[derive(serde::Deserialize)]
    struct Followers {
        followers: TotalCount,
    }

    let data = transport
        .post(GraphQlRequest::new(
            queries::FOLLOWERS_OP,
            queries::FOLLOWERS,
            json!({ "login": login }),
        ))
        .await?;
    let user: Followers = decode(queries::FOLLOWERS_OP, user_field(queries::FOLLOWERS_OP, data)?)?;
    Ok(user.followers.total_count)
}

/// Count repositories and total stargazers across the given affiliations.
pub async fn repository_stats<T: GraphQlTransport>(
    transport: &mut T,
    login: &str,
    affiliations: &[Affiliation],
) -> Result<RepoStats> {
    #[derive(serde::Deserialize)]
    struct Repositories {
        repositories: Connection<StarNode>,
    }

    let mut stats = RepoStats::default();
    let mut repos_seen = None;
    let mut cursor: Option<String> = None;

    loop {
        let data = transport
            .post(GraphQlRequest::new(
                queries::REPO_STATS_OP,
                queries::REPO_STATS,
                json!({
                    "first": PAGE_SIZE,
                    "login": login,
                    "affiliations": affiliations,
                    "cursor": cursor,
                }),
            ))
            .await?;
        let page: Repositories =
            decode(queries::REPO_STATS_OP, user_field(queries::REPO_STATS_OP, data)?)?;
        let page = page.repositories;

        if repos_seen.is_none() {
            repos_seen = Some(page.total_count.ok_or_else(|| {
                StatsError::protocol(format!("{}: missing totalCount", queries::REPO_STATS_OP))
            })?);
        }
        stats.stars += page
            .edges
            .iter()
            .map(|e| e.node.stargazers.total_count)
            .sum::<u64>();

        match next_cursor(queries::REPO_STATS_OP, &page.page_info)? {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    stats.repos = repos_seen.unwrap_or(0);
    Ok(stats)
}

/// Sum calendar contributions between `from` and `to`, one request per year-long window.
pub async fn contribution_count<T: GraphQlTransport>(
    transport: &mut T,
    login: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<u64> {
    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Calendar {
        total_contributions: u64,
    }
    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Collection {
        contribution_calendar: Calendar,
    }
    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct User {
        contributions_collection: Collection,
    }

    let mut total = 0;
    for (start, end) in contribution_windows(from, to) {
        let data = transport
            .post(GraphQlRequest::new(
                queries::CONTRIBUTIONS_OP,
                queries::CONTRIBUTIONS,
                json!({
                    "login": login,
                    "from": start.to_rfc3339(),
                    "to": end.to_rfc3339(),
                }),
            ))
            .await?;
        let user: User = decode(
            queries::CONTRIBUTIONS_OP,
            user_field(queries::CONTRIBUTIONS_OP, data)?,
        )?;
        total += user.contributions_collection.contribution_calendar.total_contributions;
    }
    Ok(total)
}

/// Split `[from, to)` into consecutive windows no longer than a year.
fn contribution_windows(from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let step = Duration::days(MAX_CONTRIBUTION_WINDOW_DAYS);
    let mut windows = Vec::new();
    let mut start = from;
    while start < to {
        let end = (start + step).min(to);
        windows.push((start, end));
        start = end;
    }
    windows
}

/// Cursor for the next page, or `None` on the terminal page.
pub(crate) fn next_cursor(
    operation: &str,
    page_info: &super::types::PageInfo,
) -> Result<Option<String>> {
    if !page_info.has_next_page {
        return Ok(None);
    }
    page_info.end_cursor.clone().map(Some).ok_or_else(|| {
        StatsError::protocol(format!("{}: hasNextPage without endCursor", operation))
    })
}
