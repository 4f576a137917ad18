// Repository identities for the LOC pipeline.
// Splits canonical `owner/name` strings and pairs them with their commit-count fingerprint.

use std::fmt;
use std::str::FromStr;

use crate::cache::digest;
use crate::error::StatsError;

/// Repository identity, unique per repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Canonical `owner/name` identity.
    pub fn identity(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Digest stored in the cache record for this repository.
    pub fn digest(&self) -> String {
        digest(&self.identity())
    }
}

impl FromStr for RepositoryRef {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(StatsError::protocol(format!(
                "invalid repository identity {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Enumerated repository with its current default-branch commit count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub repo: RepositoryRef,
    pub fingerprint: u64,
}
