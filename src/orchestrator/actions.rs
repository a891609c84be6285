use crate::client::ClientError;
use crate::repository::{RepoId, Repository};

/// Text fields of a create or edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryDraft {
    pub name: String,
    pub description: String,
}

impl RepositoryDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub(crate) fn from_repository(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            description: repo.description.clone().unwrap_or_default(),
        }
    }

    /// Description to send on create: blank means none.
    pub(crate) fn optional_description(&self) -> Option<String> {
        let description = self.description.trim();
        (!description.is_empty()).then(|| description.to_string())
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // List
    Load,
    SetQuery(String),
    GoToPage(usize),

    // Dialogs
    OpenCreate,
    OpenEdit(RepoId),
    RequestDelete(RepoId),
    EditDraft(RepositoryDraft),
    Submit,
    ConfirmDelete,
    Cancel,

    // Completions reported by background tasks
    RepositoriesLoaded(Result<Vec<Repository>, ClientError>),
    CreateFinished(Result<Repository, ClientError>),
    UpdateFinished {
        target_id: RepoId,
        result: Result<Repository, ClientError>,
    },
}

impl Action {
    /// Whether this action reports the end of a remote call.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Action::RepositoriesLoaded(_) | Action::CreateFinished(_) | Action::UpdateFinished { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_description_is_dropped() {
        assert_eq!(RepositoryDraft::new("demo", "   ").optional_description(), None);
        assert_eq!(
            RepositoryDraft::new("demo", " test ").optional_description().as_deref(),
            Some("test")
        );
    }
}
