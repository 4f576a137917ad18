// Aggregate LOC totals.
// Sums cache records and archived contributions into the figures shown on the badges.

use std::ops::AddAssign;

use crate::cache::CacheRecord;

use super::archive::ArchiveTotals;

/// Line and commit totals across every counted repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateTotals {
    pub additions: u64,
    pub deletions: u64,
    pub net: i64,
    pub commits: u64,
}

impl AggregateTotals {
    pub fn new(additions: u64, deletions: u64, commits: u64) -> Self {
        Self {
            additions,
            deletions,
            net: net_lines(additions, deletions),
            commits,
        }
    }

    /// Sum a record set.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CacheRecord>) -> Self {
        let (additions, deletions, commits) = records.into_iter().fold((0u64, 0u64, 0u64), |acc, r| {
            (
                acc.0.saturating_add(r.additions),
                acc.1.saturating_add(r.deletions),
                acc.2.saturating_add(r.my_commits),
            )
        });
        Self::new(additions, deletions, commits)
    }
}

/// `additions - deletions`, clamped to the `i64` range.
pub fn net_lines(additions: u64, deletions: u64) -> i64 {
    let net = i128::from(additions) - i128::from(deletions);
    net.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

impl AddAssign<&ArchiveTotals> for AggregateTotals {
    fn add_assign(&mut self, archive: &ArchiveTotals) {
        *self = Self::new(
            self.additions.saturating_add(archive.additions),
            self.deletions.saturating_add(archive.deletions),
            self.commits.saturating_add(archive.commits),
        );
    }
}
