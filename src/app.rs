// Top-level run.
// Gathers account statistics and LOC totals, then refreshes the SVG templates.

use std::time::Instant;

use chrono::{DateTime, Datelike, Utc};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::github::{
    Affiliation, GitHubClient, GraphQlTransport, RepoStats, contribution_count, follower_count,
    repository_stats, user_profile,
};
use crate::loc::{self, AggregateTotals, LocContext, read_archive};
use crate::render::{Edit, age_text, overwrite_templates, thousands};

/// Fill color of the tspan carrying the added/deleted line counts.
pub const LOC_DELTA_COLOR: &str = "#bb9af7";

/// Figures shown on the badges, apart from the age text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileStats {
    /// Repositories across every affiliation, with their stars.
    pub repos: RepoStats,
    /// Affiliated repositories plus archived ones.
    pub contributed: u64,
    pub followers: u64,
    /// Calendar contributions since the account was created.
    pub contributions: u64,
    /// LOC totals including archived repositories.
    pub loc: AggregateTotals,
}

impl ProfileStats {
    /// Template edits that render these figures.
    pub fn edits(&self, age: &str) -> Vec<Edit> {
        vec![
            Edit::field("age_data", age),
            Edit::field("commit_data", thousands(self.contributions)),
            Edit::field("star_data", thousands(self.repos.stars)),
            Edit::field("repo_data", thousands(self.repos.repos)),
            Edit::field("contrib_data", thousands(self.contributed)),
            Edit::field("follower_data", thousands(self.followers)),
            Edit::field("loc_data", thousands(self.loc.net)),
            Edit::accent(
                "loc_data",
                LOC_DELTA_COLOR,
                format!(
                    "(+{} / -{})",
                    thousands(self.loc.additions),
                    thousands(self.loc.deletions)
                ),
            ),
        ]
    }
}

/// Log how long a phase took.
fn phase_done(name: &str, start: Instant) {
    info!(phase = name, elapsed_ms = start.elapsed().as_millis() as u64, "phase complete");
}

/// Collect every statistic for `config.user` as of `now`.
pub async fn collect<T: GraphQlTransport>(
    transport: &mut T,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<ProfileStats> {
    let login = config.user.as_str();

    let start = Instant::now();
    let profile = user_profile(transport, login).await?;
    phase_done("profile", start);

    let start = Instant::now();
    let repos = repository_stats(transport, login, &Affiliation::ALL).await?;
    phase_done("repositories", start);

    let start = Instant::now();
    let followers = follower_count(transport, login).await?;
    phase_done("followers", start);

    let start = Instant::now();
    let contributions = contribution_count(transport, login, profile.created_at, now).await?;
    phase_done("contributions", start);

    let start = Instant::now();
    let store = config.cache_store();
    let mut loc_totals = if config.loc_due(now.weekday()) {
        let ctx = LocContext {
            login,
            owner_id: &profile.id,
            affiliations: &Affiliation::ALL,
        };
        loc::compute_totals(transport, &store, &ctx).await?.totals
    } else {
        info!("not a LOC day, using cached totals");
        loc::cached_totals(&store)?
    };
    phase_done("loc", start);

    let archive = read_archive(&config.archive, config.archive_layout).unwrap_or_else(|err| {
        warn!(path = %config.archive.display(), "ignoring unreadable archive: {}", err);
        Default::default()
    });
    loc_totals += &archive;

    Ok(ProfileStats {
        repos,
        contributed: repos.repos.saturating_add(archive.repo_count),
        followers,
        contributions,
        loc: loc_totals,
    })
}

/// Collect statistics over `transport` and rewrite the templates.
///
/// A failed collection is logged and the templates get zeros instead.
pub async fn run_with<T: GraphQlTransport>(
    transport: &mut T,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let age = age_text(config.birthday, now.date_naive());

    let stats = match collect(transport, config, now).await {
        Ok(stats) => stats,
        Err(err) => {
            error!("statistics unavailable, writing defaults: {}", err);
            ProfileStats::default()
        }
    };

    overwrite_templates(&config.templates, &stats.edits(&age))
}

/// Run once against GitHub.
pub async fn run(config: &Config) -> Result<()> {
    let mut client = GitHubClient::new(&config.token, config.timeout)?
        .with_endpoint(config.endpoint.clone());

    let result = run_with(&mut client, config, Utc::now()).await;

    for (operation, count) in client.stats().iter() {
        info!(operation, count, "GraphQL requests");
    }
    info!(total = client.stats().total(), "GraphQL requests");

    result
}
