//! Domain model for repositories known to the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned repository identifier. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(pub u64);

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RepoId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Counters reported by the API. Always present on detail fetches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub forks_count: u64,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub open_issues_count: u64,
}

/// A repository as held by the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: RepoId,
    pub name: String,
    /// Login of the owning account; addresses the repository on the wire
    pub owner: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub html_url: String,
    pub updated_at: DateTime<Utc>,
    pub stats: Option<RepositoryStats>,
}

impl Repository {
    /// Apply a user edit. Only name and description are mutable.
    pub fn apply(&mut self, patch: &RepositoryPatch) {
        self.name = patch.name.clone();
        self.description = patch.description.clone();
    }

    /// Case-insensitive substring match on the name.
    ///
    /// `needle` must already be lowercased.
    pub fn name_matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

/// The user-editable fields of a repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepositoryPatch {
    pub name: String,
    pub description: Option<String>,
}

impl From<&Repository> for RepositoryPatch {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            description: repo.description.clone(),
        }
    }
}
