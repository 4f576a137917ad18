// GraphQL documents issued against the GitHub API.
// Each constant pairs with an operation name used for request accounting.

/// Connection page size for every paginated query.
pub const PAGE_SIZE: u32 = 100;

pub const USER_PROFILE_OP: &str = "user_getter";
pub const USER_PROFILE: &str = r#"
query($login: String!) {
    user(login: $login) { id createdAt }
}"#;

pub const FOLLOWERS_OP: &str = "follower_getter";
pub const FOLLOWERS: &str = r#"
query($login: String!) {
    user(login: $login) { followers { totalCount } }
}"#;

pub const REPO_STATS_OP: &str = "graph_repos_stars";
pub const REPO_STATS: &str = r#"
query($first: Int!, $login: String!, $affiliations: [RepositoryAffiliation], $cursor: String) {
    user(login: $login) {
        repositories(first: $first, after: $cursor, ownerAffiliations: $affiliations) {
            totalCount
            edges { node { stargazers { totalCount } } }
            pageInfo { endCursor hasNextPage }
        }
    }
}"#;

pub const CONTRIBUTIONS_OP: &str = "graph_commits";
pub const CONTRIBUTIONS: &str = r#"
query($login: String!, $from: DateTime!, $to: DateTime!) {
    user(login: $login) {
        contributionsCollection(from: $from, to: $to) {
            contributionCalendar { totalContributions }
        }
    }
}"#;

pub const REPO_LIST_OP: &str = "loc_query";
pub const REPO_LIST: &str = r#"
query($first: Int!, $login: String!, $affiliations: [RepositoryAffiliation], $cursor: String) {
    user(login: $login) {
        repositories(first: $first, after: $cursor, ownerAffiliations: $affiliations) {
            edges {
                node {
                    nameWithOwner
                    defaultBranchRef {
                        target { ... on Commit { history { totalCount } } }
                    }
                }
            }
            pageInfo { endCursor hasNextPage }
        }
    }
}"#;

pub const COMMIT_HISTORY_OP: &str = "recursive_loc";
pub const COMMIT_HISTORY: &str = r#"
query($first: Int!, $owner: String!, $name: String!, $cursor: String) {
    repository(owner: $owner, name: $name) {
        defaultBranchRef {
            target {
                ... on Commit {
                    history(first: $first, after: $cursor) {
                        edges {
                            node {
                                additions
                                deletions
                                parents { totalCount }
                                author { user { id } }
                            }
                        }
                        pageInfo { endCursor hasNextPage }
                    }
                }
            }
        }
    }
}"#;
