//! Single-repository detail view.
//!
//! Unlike list actions, a failed detail fetch does not raise a notification;
//! the view shows an inline "unavailable" message instead.

use log::warn;

use crate::client::RepositoryClient;
use crate::constants::DETAIL_UNAVAILABLE;
use crate::repository::Repository;
use crate::utils::datetime;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Repository),
    Unavailable { reason: String },
}

#[derive(Debug, Clone)]
pub struct DetailView {
    name: String,
    state: DetailState,
}

impl DetailView {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: DetailState::Loading,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn repository(&self) -> Option<&Repository> {
        match &self.state {
            DetailState::Loaded(repo) => Some(repo),
            _ => None,
        }
    }

    /// Fetch the repository named by this view.
    pub async fn load(&mut self, client: &dyn RepositoryClient) -> &DetailState {
        self.state = DetailState::Loading;
        self.state = match client.get_repository(&self.name).await {
            Ok(repo) => DetailState::Loaded(repo),
            Err(e) => {
                warn!("Detail fetch for '{}' failed: {e}", self.name);
                DetailState::Unavailable {
                    reason: format!("{DETAIL_UNAVAILABLE}: {}", e.message()),
                }
            }
        };
        &self.state
    }

    /// "Last updated: ..." for the loaded repository.
    pub fn last_updated(&self, date_format: &str) -> Option<String> {
        self.repository()
            .map(|repo| datetime::last_updated_label(&repo.updated_at, date_format))
    }
}
