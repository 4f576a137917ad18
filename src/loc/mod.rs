// Lines-of-code accounting.
// Enumerates repositories, walks commit history on cache misses, and totals the results.

pub mod archive;
pub mod enumerate;
pub mod pipeline;
pub mod repo;
pub mod totals;
pub mod walker;

pub use archive::{ArchiveLayout, ArchiveTotals, read_archive};
pub use enumerate::enumerate_repositories;
pub use pipeline::{LocContext, LocReport, ReconcileStats, cached_totals, compute_totals, reconcile};
pub use repo::{RepoEntry, RepositoryRef};
pub use totals::AggregateTotals;
pub use walker::{LocCounts, walk_history};
