// Error types for readme-stats.
// Covers GraphQL transport failures, malformed payloads, cache corruption, and filesystem errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("GitHub API error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed API response: {0}")]
    Protocol(String),

    #[error("Corrupt cache record on line {line}: {reason}")]
    CacheCorruption { line: usize, reason: String },

    #[error("Cannot write {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StatsError {
    /// Whether the failure happened at the HTTP layer rather than in the payload.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            StatsError::Transport(_)
                | StatsError::Unauthorized
                | StatsError::RateLimited { .. }
                | StatsError::Http { .. }
        )
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        StatsError::Protocol(msg.into())
    }

    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StatsError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
