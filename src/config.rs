// Runtime configuration.
// Resolved from command-line flags and environment variables before a run starts.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, Weekday};

use crate::cache::{CacheStore, cache_file_path};
use crate::github::client::GITHUB_GRAPHQL_URL;
use crate::loc::ArchiveLayout;

/// Default request timeout for GraphQL calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default templates rewritten on every run.
pub const DEFAULT_TEMPLATES: [&str; 2] = ["dark_mode.svg", "light_mode.svg"];

/// Everything a run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    /// Login of the account being measured.
    pub user: String,
    /// Start date for the age badge.
    pub birthday: NaiveDate,
    pub cache_dir: PathBuf,
    /// Lines reserved for comments at the top of the cache file.
    pub comment_lines: usize,
    pub archive: PathBuf,
    pub archive_layout: ArchiveLayout,
    pub templates: Vec<PathBuf>,
    /// Only walk commit history on this weekday; other days reuse the cache.
    pub loc_weekday: Option<Weekday>,
    pub timeout: Duration,
    pub endpoint: String,
}

impl Config {
    /// Minimal configuration with defaults for everything but credentials.
    pub fn new(token: impl Into<String>, user: impl Into<String>) -> Self {
        let cache_dir = PathBuf::from(crate::cache::DEFAULT_CACHE_DIR);
        Self {
            token: token.into(),
            user: user.into(),
            birthday: NaiveDate::from_ymd_opt(2006, 12, 12).unwrap_or_default(),
            archive: crate::cache::archive_path(&cache_dir),
            cache_dir,
            comment_lines: crate::cache::record::COMMENT_BLOCK_LINES,
            archive_layout: ArchiveLayout::default(),
            templates: DEFAULT_TEMPLATES.iter().map(PathBuf::from).collect(),
            loc_weekday: None,
            timeout: DEFAULT_TIMEOUT,
            endpoint: GITHUB_GRAPHQL_URL.to_string(),
        }
    }

    /// Cache store for the configured user.
    pub fn cache_store(&self) -> CacheStore {
        CacheStore::new(cache_file_path(&self.cache_dir, &self.user))
            .with_comment_lines(self.comment_lines)
    }

    /// Whether commit history should be walked on `today`.
    pub fn loc_due(&self, today: Weekday) -> bool {
        self.loc_weekday.is_none_or(|day| day == today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("token", "octocat");
        assert_eq!(config.birthday, NaiveDate::from_ymd_opt(2006, 12, 12).unwrap());
        assert_eq!(config.templates.len(), 2);
        assert!(config.archive.ends_with("cache/repository_archive.txt"));
        assert!(
            config
                .cache_store()
                .path()
                .starts_with(crate::cache::DEFAULT_CACHE_DIR)
        );
    }

    #[test]
    fn test_loc_due() {
        let mut config = Config::new("token", "octocat");
        assert!(config.loc_due(Weekday::Sat));

        config.loc_weekday = Some(Weekday::Tue);
        assert!(config.loc_due(Weekday::Tue));
        assert!(!config.loc_due(Weekday::Wed));
    }
}
