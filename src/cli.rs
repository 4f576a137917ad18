// Command-line interface.
// Parses flags (with environment fallbacks) into a run configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, Weekday};
use clap::Parser;

use crate::config::Config;
use crate::error::{Result, StatsError};
use crate::loc::ArchiveLayout;

#[derive(Parser, Debug)]
#[command(name = "readme-stats")]
#[command(about = "Compute GitHub profile statistics and write them into SVG templates")]
#[command(version)]
pub struct Cli {
    #[arg(long, env = "USER_NAME", help = "GitHub login to measure")]
    pub user: String,

    #[arg(
        long,
        env = "ACCESS_TOKEN",
        hide_env_values = true,
        help = "API token (falls back to GITHUB_TOKEN)"
    )]
    pub token: Option<String>,

    #[arg(long, default_value = "2006-12-12", help = "Start date for the age badge (YYYY-MM-DD)")]
    pub birthday: NaiveDate,

    #[arg(long, default_value = crate::cache::DEFAULT_CACHE_DIR, help = "Directory holding the LOC cache")]
    pub cache_dir: PathBuf,

    #[arg(long, help = "Archive of deleted repositories [default: <cache-dir>/repository_archive.txt]")]
    pub archive: Option<PathBuf>,

    #[arg(long, default_value_t = crate::loc::archive::ARCHIVE_HEADER_LINES, help = "Comment lines before archived records")]
    pub archive_header: usize,

    #[arg(long, default_value_t = crate::loc::archive::ARCHIVE_FOOTER_LINES, help = "Lines after archived records, ending with the summary line")]
    pub archive_footer: usize,

    #[arg(long, default_value_t = crate::cache::record::COMMENT_BLOCK_LINES, help = "Comment lines at the top of the LOC cache")]
    pub comment_lines: usize,

    #[arg(long = "template", help = "SVG template to update (repeatable) [default: dark_mode.svg, light_mode.svg]")]
    pub templates: Vec<PathBuf>,

    #[arg(long, help = "Only walk commit history on this weekday (mon..sun)")]
    pub loc_weekday: Option<Weekday>,

    #[arg(long, default_value_t = 30, help = "Request timeout in seconds")]
    pub timeout_secs: u64,

    #[arg(long, env = "GITHUB_GRAPHQL_URL", help = "GraphQL endpoint override")]
    pub endpoint: Option<String>,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Resolve flags into a [`Config`], reading `GITHUB_TOKEN` if no token was given.
    pub fn into_config(self) -> Result<Config> {
        let token = match self.token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => std::env::var("GITHUB_TOKEN").map_err(|_| {
                StatsError::Config("missing ACCESS_TOKEN or GITHUB_TOKEN".to_string())
            })?,
        };
        if self.user.trim().is_empty() {
            return Err(StatsError::Config("empty user name".to_string()));
        }

        let mut config = Config::new(token, self.user);
        config.birthday = self.birthday;
        config.archive = self
            .archive
            .unwrap_or_else(|| crate::cache::archive_path(&self.cache_dir));
        config.cache_dir = self.cache_dir;
        config.comment_lines = self.comment_lines;
        config.archive_layout = ArchiveLayout {
            header_lines: self.archive_header,
            footer_lines: self.archive_footer,
        };
        if !self.templates.is_empty() {
            config.templates = self.templates;
        }
        config.loc_weekday = self.loc_weekday;
        config.timeout = Duration::from_secs(self.timeout_secs);
        if let Some(endpoint) = self.endpoint {
            config.endpoint = endpoint;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "readme-stats",
            "--user",
            "octocat",
            "--token",
            "t0k3n",
            "--cache-dir",
            "state",
            "--template",
            "a.svg",
            "--loc-weekday",
            "tue",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        assert_eq!(config.user, "octocat");
        assert_eq!(config.token, "t0k3n");
        assert_eq!(config.templates, vec![PathBuf::from("a.svg")]);
        assert_eq!(config.loc_weekday, Some(Weekday::Tue));
        assert!(config.archive.ends_with("state/repository_archive.txt"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_birthday_must_be_a_date() {
        let result = Cli::try_parse_from([
            "readme-stats",
            "--user",
            "octocat",
            "--birthday",
            "yesterday",
        ]);
        assert!(result.is_err());
    }
}
