// LOC pipeline.
// Reconciles the live repository list against the cache and walks only repositories that changed.

use tracing::{debug, info, warn};

use crate::cache::{CacheFile, CacheRecord, CacheStore};
use crate::error::Result;
use crate::github::{Affiliation, GraphQlTransport};

use super::enumerate::enumerate_repositories;
use super::repo::RepoEntry;
use super::totals::AggregateTotals;
use super::walker::walk_history;

/// Who the pipeline counts for.
#[derive(Debug, Clone, Copy)]
pub struct LocContext<'a> {
    /// Login whose repositories are enumerated.
    pub login: &'a str,
    /// Stable account id that commits are attributed to.
    pub owner_id: &'a str,
    pub affiliations: &'a [Affiliation],
}

/// Work done by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Repositories whose history was walked.
    pub walked: usize,
    /// Repositories served from the cache.
    pub cached: usize,
    /// Whether the record set was discarded for a size mismatch.
    pub rebuilt: bool,
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocReport {
    pub totals: AggregateTotals,
    pub stats: ReconcileStats,
}

/// Enumerate, reconcile against the cache, persist, and sum.
///
/// If a history walk fails, the records reconciled so far are still written
/// before the error is returned, so the next run resumes from them.
pub async fn compute_totals<T: GraphQlTransport>(
    transport: &mut T,
    store: &CacheStore,
    ctx: &LocContext<'_>,
) -> Result<LocReport> {
    let entries = enumerate_repositories(transport, ctx.login, ctx.affiliations).await?;
    let mut file = store.load()?;

    let stats = match reconcile(transport, &mut file, &entries, ctx.owner_id).await {
        Ok(stats) => stats,
        Err(err) => {
            if let Err(save_err) = store.save(&file) {
                warn!(path = %store.path().display(), "checkpoint failed: {}", save_err);
            }
            return Err(err);
        }
    };
    store.save(&file)?;

    let totals = AggregateTotals::from_records(&file.records);
    info!(
        repos = entries.len(),
        walked = stats.walked,
        cached = stats.cached,
        rebuilt = stats.rebuilt,
        "LOC cache reconciled"
    );
    Ok(LocReport { totals, stats })
}

/// Sum the cache as it stands, without touching the network.
pub fn cached_totals(store: &CacheStore) -> Result<AggregateTotals> {
    let file = store.load()?;
    Ok(AggregateTotals::from_records(&file.records))
}

/// Bring `file` in line with `entries`, walking every position whose
/// fingerprint or digest no longer matches.
pub async fn reconcile<T: GraphQlTransport>(
    transport: &mut T,
    file: &mut CacheFile,
    entries: &[RepoEntry],
    owner_id: &str,
) -> Result<ReconcileStats> {
    let mut stats = ReconcileStats::default();

    if file.records.len() != entries.len() {
        debug!(
            cached = file.records.len(),
            live = entries.len(),
            "repository count changed, rebuilding LOC cache"
        );
        file.records = entries
            .iter()
            .map(|entry| CacheRecord::placeholder(entry.repo.digest()))
            .collect();
        stats.rebuilt = true;
    }

    for (record, entry) in file.records.iter_mut().zip(entries) {
        let repo_hash = entry.repo.digest();
        let same_repo = record.repo_hash == repo_hash;

        if !stats.rebuilt && same_repo && record.fingerprint == entry.fingerprint {
            debug!(repo = %entry.repo, "cache hit");
            stats.cached += 1;
            continue;
        }
        if !same_repo {
            debug!(repo = %entry.repo, "cache position holds another repository");
        }

        let counts = walk_history(transport, &entry.repo, owner_id).await?;
        *record = CacheRecord {
            repo_hash,
            fingerprint: entry.fingerprint,
            my_commits: counts.commits,
            additions: counts.additions,
            deletions: counts.deletions,
        };
        stats.walked += 1;
    }

    Ok(stats)
}
