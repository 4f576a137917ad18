// Archived repository statistics.
// Reads contributions from repositories that are no longer enumerable.

use std::path::Path;

use tracing::warn;

use crate::cache::read_text;
use crate::error::Result;

use super::totals::net_lines;

/// Default number of comment lines before the archived records.
pub const ARCHIVE_HEADER_LINES: usize = 7;

/// Default number of lines after the records; the last one is the summary line.
pub const ARCHIVE_FOOTER_LINES: usize = 3;

/// Contribution of archived repositories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveTotals {
    pub additions: u64,
    pub deletions: u64,
    pub net: i64,
    pub commits: u64,
    pub repo_count: u64,
}

/// Layout of an archive file.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveLayout {
    pub header_lines: usize,
    pub footer_lines: usize,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self {
            header_lines: ARCHIVE_HEADER_LINES,
            footer_lines: ARCHIVE_FOOTER_LINES,
        }
    }
}

/// Read the archive at `path`. A missing file contributes nothing.
pub fn read_archive(path: &Path, layout: ArchiveLayout) -> Result<ArchiveTotals> {
    let Some(text) = read_text(path)? else {
        return Ok(ArchiveTotals::default());
    };
    Ok(parse_archive(&text, layout))
}

/// Sum archived records. Unparseable record lines are skipped with a warning.
pub fn parse_archive(text: &str, layout: ArchiveLayout) -> ArchiveTotals {
    let lines: Vec<&str> = text.lines().collect();
    let body_end = lines.len().saturating_sub(layout.footer_lines);
    let body = lines.get(layout.header_lines..body_end).unwrap_or_default();

    let mut totals = ArchiveTotals::default();
    for (offset, line) in body.iter().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let loc = match fields.as_slice() {
            [_hash, _total, _mine, additions, deletions, ..] => {
                additions.parse::<u64>().ok().zip(deletions.parse::<u64>().ok())
            }
            _ => None,
        };
        let Some((additions, deletions)) = loc else {
            warn!(
                line = layout.header_lines + offset + 1,
                "skipping malformed archive record"
            );
            continue;
        };

        totals.additions = totals.additions.saturating_add(additions);
        totals.deletions = totals.deletions.saturating_add(deletions);
        // Archived rows may carry a placeholder instead of a commit count.
        totals.commits = totals
            .commits
            .saturating_add(fields[2].parse::<u64>().unwrap_or(0));
        totals.repo_count += 1;
    }

    if layout.footer_lines > 0 {
        let summary = lines.last().map_or(0, |line| summary_commits(line));
        totals.commits = totals.commits.saturating_add(summary);
    }
    totals.net = net_lines(totals.additions, totals.deletions);
    totals
}

/// Commit count from the summary line: its last token, ignoring trailing punctuation.
fn summary_commits(line: &str) -> u64 {
    line.split_whitespace()
        .last()
        .map(|token| token.trim_end_matches(|c: char| !c.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}
