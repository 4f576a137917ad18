// GitHub API module.
// Provides the GraphQL client, response types, and account statistics queries.

pub mod client;
pub mod endpoints;
pub mod queries;
pub mod types;

pub use client::{GitHubClient, GraphQlRequest, GraphQlTransport, QueryStats};
pub use endpoints::{contribution_count, follower_count, repository_stats, user_profile};
pub use types::{Affiliation, RateLimit, RepoStats, UserProfile};
