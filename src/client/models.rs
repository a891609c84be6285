//! Wire schema for GitHub repository payloads.
//!
//! Bodies are decoded into these structs rather than loose JSON so that a
//! response with a missing or mistyped field is rejected at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::{RepoId, Repository, RepositoryStats};

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRepository {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) owner: ApiOwner,
    pub(crate) description: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) html_url: String,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) forks_count: Option<u64>,
    pub(crate) stargazers_count: Option<u64>,
    pub(crate) watchers_count: Option<u64>,
    pub(crate) open_issues_count: Option<u64>,
}

/// The `owner` object of a repository, or the body of `GET /user`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiOwner {
    pub(crate) login: String,
}

impl From<ApiRepository> for Repository {
    fn from(api: ApiRepository) -> Self {
        let stats = match (
            api.forks_count,
            api.stargazers_count,
            api.watchers_count,
            api.open_issues_count,
        ) {
            (Some(forks_count), Some(stargazers_count), Some(watchers_count), Some(open_issues_count)) => {
                Some(RepositoryStats {
                    forks_count,
                    stargazers_count,
                    watchers_count,
                    open_issues_count,
                })
            }
            _ => None,
        };

        Repository {
            id: RepoId(api.id),
            name: api.name,
            owner: api.owner.login,
            description: api.description,
            language: api.language,
            html_url: api.html_url,
            updated_at: api.updated_at,
            stats,
        }
    }
}

/// Body for `POST /user/repos` and `PATCH /repos/{owner}/{repo}`.
#[derive(Debug, Serialize)]
pub(crate) struct RepositoryPayload<'a> {
    pub(crate) name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub(crate) message: String,
}

/// Pull GitHub's `message` out of an error body, falling back to the raw text.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => fallback.to_string(),
    }
}
