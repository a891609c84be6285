//! Remote collection client.
//!
//! This module defines the interface the orchestrator uses to talk to the
//! repository host, along with the failure taxonomy every implementation maps
//! its errors into. Implementations never touch local state.

use async_trait::async_trait;
use std::fmt;

use crate::repository::Repository;

pub mod github;
pub mod models;
pub mod paging;

pub use github::GitHubClient;

/// Failures a remote call can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Upstream error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream { status: Option<u16>, message: String },
}

/// Coarse failure category, used for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Auth,
    NotFound,
    Validation,
    Upstream,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Network => "network",
            FailureKind::Auth => "auth",
            FailureKind::NotFound => "not found",
            FailureKind::Validation => "validation",
            FailureKind::Upstream => "upstream",
        };
        f.write_str(label)
    }
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Network(_) => FailureKind::Network,
            ClientError::Auth(_) => FailureKind::Auth,
            ClientError::NotFound(_) => FailureKind::NotFound,
            ClientError::Validation(_) => FailureKind::Validation,
            ClientError::Upstream { .. } => FailureKind::Upstream,
        }
    }

    /// The human part of the error, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            ClientError::Network(m)
            | ClientError::Auth(m)
            | ClientError::NotFound(m)
            | ClientError::Validation(m) => m,
            ClientError::Upstream { message, .. } => message,
        }
    }

    /// Map a non-success HTTP status to its failure category.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ClientError::Auth(message),
            404 => ClientError::NotFound(message),
            _ => ClientError::Upstream {
                status: Some(status),
                message,
            },
        }
    }
}

/// Arguments for creating a repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateRepositoryArgs {
    pub name: String,
    pub description: Option<String>,
}

/// Arguments for updating a repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateRepositoryArgs {
    pub name: String,
    pub description: Option<String>,
}

/// Reject a name that cannot be submitted.
pub fn validate_name(name: &str) -> Result<(), ClientError> {
    if name.trim().is_empty() {
        return Err(ClientError::Validation("repository name cannot be empty".to_string()));
    }
    Ok(())
}

/// Interface to the host that owns the repository collection.
///
/// There is intentionally no delete operation: deleting is a local store
/// operation only.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Whether write operations (create/update) are available.
    fn can_write(&self) -> bool;

    async fn list_repositories(&self) -> Result<Vec<Repository>, ClientError>;
    async fn get_repository(&self, name: &str) -> Result<Repository, ClientError>;
    async fn create_repository(&self, args: CreateRepositoryArgs) -> Result<Repository, ClientError>;

    /// Update `target`. Its id identifies the entry, its current name
    /// addresses it on the wire.
    async fn update_repository(
        &self,
        target: &Repository,
        args: UpdateRepositoryArgs,
    ) -> Result<Repository, ClientError>;
}
