//! Action orchestration for the repository list.
//!
//! The [`Orchestrator`] owns the [`RepositoryStore`] and sequences every user
//! action against it: create and edit go through a form and a remote call,
//! delete goes through an explicit confirmation and never reaches the
//! network. At most one dialog is open at a time.
//!
//! Remote calls run in the background through a [`TaskManager`]; their
//! results come back as completion [`Action`]s which the caller feeds in with
//! [`Orchestrator::next_completion`]. All state changes happen on `&mut self`,
//! so they are applied atomically between suspension points.

pub mod actions;
pub mod task_manager;

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::client::{ClientError, CreateRepositoryArgs, FailureKind, RepositoryClient, UpdateRepositoryArgs};
use crate::config::Config;
use crate::constants::{
    ERROR_CREATE_FAILED, ERROR_DUPLICATE_NAME, ERROR_EMPTY_NAME, ERROR_LOAD_FAILED, ERROR_READ_ONLY,
    ERROR_UPDATE_FAILED, SUCCESS_REPOSITORY_CREATED, SUCCESS_REPOSITORY_DELETED, SUCCESS_REPOSITORY_UPDATED,
    SUCCESS_REPOSITORY_UPDATED_UNLISTED,
};
use crate::repository::{RepoId, Repository, RepositoryPatch};
use crate::store::{page_count, InsertOutcome, RepositoryStore, StoreError};

pub use actions::{Action, RepositoryDraft};
pub use task_manager::{TaskId, TaskManager};

#[derive(Debug, Clone, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Another dialog is already open")]
    DialogOpen,

    #[error("No dialog is open")]
    NoDialog,

    #[error("This action does not apply to the open dialog")]
    WrongDialog,

    #[error("A request is already in progress")]
    Busy,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message for the view to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub failure: Option<FailureKind>,
}

impl Notification {
    fn success(message: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.to_string(),
            failure: None,
        }
    }

    fn failure(context: &str, error: &ClientError) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: format!("{context}: {}", error.message()),
            failure: Some(error.kind()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Drafting,
    Submitting,
}

/// State of an open create or edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDialog {
    /// The repository being edited; `None` for create
    pub target_id: Option<RepoId>,
    pub draft: RepositoryDraft,
    pub phase: FormPhase,
    /// Why the last submission failed, if it did
    pub error: Option<ClientError>,
}

impl FormDialog {
    fn new(target_id: Option<RepoId>, draft: RepositoryDraft) -> Self {
        Self {
            target_id,
            draft,
            phase: FormPhase::Drafting,
            error: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Dialog {
    #[default]
    None,
    Create(FormDialog),
    Edit(FormDialog),
    DeleteConfirm {
        target_id: RepoId,
    },
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::None)
    }

    pub fn form(&self) -> Option<&FormDialog> {
        match self {
            Dialog::Create(form) | Dialog::Edit(form) => Some(form),
            _ => None,
        }
    }

    fn form_mut(&mut self) -> Option<&mut FormDialog> {
        match self {
            Dialog::Create(form) | Dialog::Edit(form) => Some(form),
            _ => None,
        }
    }
}

/// Render-ready snapshot of the list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<'a> {
    pub items: Vec<&'a Repository>,
    pub query: &'a str,
    pub page: usize,
    pub page_count: usize,
    pub total_matches: usize,
    pub loading: bool,
    pub load_error: Option<&'a ClientError>,
    pub can_write: bool,
}

pub struct Orchestrator {
    client: Arc<dyn RepositoryClient>,
    store: RepositoryStore,
    dialog: Dialog,
    query: String,
    page: usize,
    page_size: usize,
    loading: bool,
    load_error: Option<ClientError>,
    notifications: Vec<Notification>,
    tasks: TaskManager,
    completions: mpsc::UnboundedReceiver<Action>,
}

impl Orchestrator {
    /// Must be used from within a tokio runtime once remote calls are made.
    pub fn new(client: Arc<dyn RepositoryClient>, page_size: usize, timeout: Duration) -> Self {
        let (tasks, completions) = TaskManager::new(timeout);
        Self {
            client,
            store: RepositoryStore::new(),
            dialog: Dialog::None,
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
            loading: false,
            load_error: None,
            notifications: Vec::new(),
            tasks,
            completions,
        }
    }

    pub fn from_config(client: Arc<dyn RepositoryClient>, config: &Config) -> Self {
        Self::new(client, config.display.page_size, config.github.timeout())
    }

    pub fn store(&self) -> &RepositoryStore {
        &self.store
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn can_write(&self) -> bool {
        self.client.can_write()
    }

    /// Number of remote calls still tracked.
    pub fn active_tasks(&mut self) -> usize {
        self.tasks.cleanup_finished_tasks();
        self.tasks.task_count()
    }

    /// Hand queued notifications to the view.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn list_view(&self) -> ListView<'_> {
        let slice = self.store.page(&self.query, self.page, self.page_size);
        ListView {
            items: slice.items,
            query: &self.query,
            page: slice.page,
            page_count: slice.page_count,
            total_matches: slice.total_matches,
            loading: self.loading,
            load_error: self.load_error.as_ref(),
            can_write: self.client.can_write(),
        }
    }

    /// Route an action to its handler.
    pub fn dispatch(&mut self, action: Action) -> Result<(), OrchestratorError> {
        match action {
            Action::Load => self.load(),
            Action::SetQuery(query) => {
                self.set_query(query);
                Ok(())
            }
            Action::GoToPage(page) => {
                self.go_to_page(page);
                Ok(())
            }
            Action::OpenCreate => self.open_create(),
            Action::OpenEdit(id) => self.open_edit(id),
            Action::RequestDelete(id) => self.request_delete(id),
            Action::EditDraft(draft) => self.set_draft(draft),
            Action::Submit => self.submit().map(|_| ()),
            Action::ConfirmDelete => self.confirm_delete().map(|_| ()),
            Action::Cancel => self.cancel(),
            Action::RepositoriesLoaded(result) => {
                self.on_loaded(result);
                Ok(())
            }
            Action::CreateFinished(result) => {
                self.on_create_finished(result);
                Ok(())
            }
            Action::UpdateFinished { target_id, result } => {
                self.on_update_finished(target_id, result);
                Ok(())
            }
        }
    }

    /// Apply the next completion, waiting for one if a call is in flight.
    ///
    /// Returns `false` once nothing is pending.
    pub async fn next_completion(&mut self) -> bool {
        loop {
            if let Ok(action) = self.completions.try_recv() {
                self.apply_completion(action);
                return true;
            }
            if !self.tasks.wait_oldest().await {
                return false;
            }
        }
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn try_process_completions(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(action) = self.completions.try_recv() {
            self.apply_completion(action);
            processed += 1;
        }
        processed
    }

    /// Wait until no remote call is outstanding.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn apply_completion(&mut self, action: Action) {
        debug_assert!(action.is_completion());
        if let Err(e) = self.dispatch(action) {
            warn!("Completion could not be applied: {e}");
        }
    }

    // List

    /// Start the initial (or a fresh) load of the collection.
    pub fn load(&mut self) -> Result<(), OrchestratorError> {
        if self.loading {
            return Err(OrchestratorError::Busy);
        }
        self.loading = true;
        self.load_error = None;
        self.tasks.spawn_load(Arc::clone(&self.client));
        Ok(())
    }

    /// Change the search query. The view returns to the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    /// Move to `page`, clamped to the pages that exist. Returns the new page.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.last_page());
        self.page
    }

    fn last_page(&self) -> usize {
        let matches = crate::store::filter(self.store.as_slice(), &self.query).len();
        page_count(matches, self.page_size).max(1)
    }

    fn clamp_page(&mut self) {
        self.page = self.page.min(self.last_page()).max(1);
    }

    fn on_loaded(&mut self, result: Result<Vec<Repository>, ClientError>) {
        self.loading = false;
        match result {
            Ok(repos) => {
                info!("Loaded {} repositories", repos.len());
                self.store.replace_all(repos);
                self.load_error = None;
                self.clamp_page();
                if let Some(target_id) = self.dialog_target() {
                    if self.store.get(target_id).is_none() && !self.is_submitting() {
                        warn!("Repository {target_id} disappeared after reload; closing dialog");
                        self.dialog = Dialog::None;
                    }
                }
            }
            Err(e) => {
                warn!("Loading repositories failed: {e}");
                self.notifications.push(Notification::failure(ERROR_LOAD_FAILED, &e));
                self.load_error = Some(e);
            }
        }
    }

    // Dialogs

    fn ensure_idle(&self) -> Result<(), OrchestratorError> {
        if self.dialog.is_open() {
            return Err(OrchestratorError::DialogOpen);
        }
        Ok(())
    }

    fn ensure_writable(&mut self) -> Result<(), OrchestratorError> {
        if self.client.can_write() {
            return Ok(());
        }
        let error = ClientError::Auth(ERROR_READ_ONLY.to_string());
        self.notifications.push(Notification {
            kind: NotificationKind::Error,
            message: ERROR_READ_ONLY.to_string(),
            failure: Some(FailureKind::Auth),
        });
        Err(error.into())
    }

    fn dialog_target(&self) -> Option<RepoId> {
        match &self.dialog {
            Dialog::None | Dialog::Create(_) => None,
            Dialog::Edit(form) => form.target_id,
            Dialog::DeleteConfirm { target_id } => Some(*target_id),
        }
    }

    fn is_submitting(&self) -> bool {
        self.dialog.form().is_some_and(FormDialog::is_submitting)
    }

    pub fn open_create(&mut self) -> Result<(), OrchestratorError> {
        self.ensure_idle()?;
        self.ensure_writable()?;
        self.dialog = Dialog::Create(FormDialog::new(None, RepositoryDraft::default()));
        Ok(())
    }

    /// Open the edit form pre-filled with the repository's current fields.
    pub fn open_edit(&mut self, id: RepoId) -> Result<(), OrchestratorError> {
        self.ensure_idle()?;
        let draft = self
            .store
            .get(id)
            .map(RepositoryDraft::from_repository)
            .ok_or(StoreError::NotFound(id))?;
        self.ensure_writable()?;
        self.dialog = Dialog::Edit(FormDialog::new(Some(id), draft));
        Ok(())
    }

    /// Ask for confirmation before removing a repository from the list.
    pub fn request_delete(&mut self, id: RepoId) -> Result<(), OrchestratorError> {
        self.ensure_idle()?;
        if self.store.get(id).is_none() {
            return Err(StoreError::NotFound(id).into());
        }
        self.dialog = Dialog::DeleteConfirm { target_id: id };
        Ok(())
    }

    /// Replace the form's draft. A submitting form is locked.
    pub fn set_draft(&mut self, draft: RepositoryDraft) -> Result<(), OrchestratorError> {
        let form = match &mut self.dialog {
            Dialog::None => return Err(OrchestratorError::NoDialog),
            Dialog::DeleteConfirm { .. } => return Err(OrchestratorError::WrongDialog),
            Dialog::Create(form) | Dialog::Edit(form) => form,
        };
        if form.is_submitting() {
            return Err(OrchestratorError::Busy);
        }
        form.draft = draft;
        form.error = None;
        Ok(())
    }

    /// Validate the open form and send it. Returns the id of the spawned call.
    pub fn submit(&mut self) -> Result<TaskId, OrchestratorError> {
        let (target_id, draft, is_edit) = match &self.dialog {
            Dialog::None => return Err(OrchestratorError::NoDialog),
            Dialog::DeleteConfirm { .. } => return Err(OrchestratorError::WrongDialog),
            Dialog::Create(form) | Dialog::Edit(form) => {
                if form.is_submitting() {
                    return Err(OrchestratorError::Busy);
                }
                (form.target_id, form.draft.clone(), matches!(self.dialog, Dialog::Edit(_)))
            }
        };
        let context = if is_edit { ERROR_UPDATE_FAILED } else { ERROR_CREATE_FAILED };

        if let Err(error) = self.validate_draft(&draft, target_id) {
            self.notifications.push(Notification::failure(context, &error));
            if let Some(form) = self.dialog.form_mut() {
                form.error = Some(error.clone());
            }
            return Err(error.into());
        }

        let name = draft.name.trim().to_string();
        let task_id = match target_id {
            None => {
                let args = CreateRepositoryArgs {
                    name,
                    description: draft.optional_description(),
                };
                info!("Submitting create for '{}'", args.name);
                self.tasks.spawn_create(Arc::clone(&self.client), args)
            }
            Some(id) => {
                let Some(target) = self.store.get(id).cloned() else {
                    self.dialog = Dialog::None;
                    return Err(StoreError::NotFound(id).into());
                };
                let args = UpdateRepositoryArgs {
                    name,
                    description: Some(draft.description.trim().to_string()),
                };
                info!("Submitting edit of {} as '{}'", id, args.name);
                self.tasks.spawn_update(Arc::clone(&self.client), target, args)
            }
        };

        if let Some(form) = self.dialog.form_mut() {
            form.phase = FormPhase::Submitting;
            form.error = None;
        }
        Ok(task_id)
    }

    fn validate_draft(&self, draft: &RepositoryDraft, target_id: Option<RepoId>) -> Result<(), ClientError> {
        if draft.name.trim().is_empty() {
            return Err(ClientError::Validation(ERROR_EMPTY_NAME.to_string()));
        }
        if self.store.name_taken(&draft.name, target_id) {
            return Err(ClientError::Validation(ERROR_DUPLICATE_NAME.to_string()));
        }
        Ok(())
    }

    /// Remove the repository awaiting confirmation.
    ///
    /// This only changes the local list; the repository still exists on the
    /// server.
    pub fn confirm_delete(&mut self) -> Result<Repository, OrchestratorError> {
        let target_id = match &self.dialog {
            Dialog::None => return Err(OrchestratorError::NoDialog),
            Dialog::DeleteConfirm { target_id } => *target_id,
            _ => return Err(OrchestratorError::WrongDialog),
        };
        self.dialog = Dialog::None;

        let removed = self.store.remove(target_id)?;
        info!("Removed repository '{}' ({}) from the list", removed.name, removed.id);
        self.notifications.push(Notification::success(SUCCESS_REPOSITORY_DELETED));
        self.clamp_page();
        Ok(removed)
    }

    /// Close the open dialog without applying anything.
    pub fn cancel(&mut self) -> Result<(), OrchestratorError> {
        match &self.dialog {
            Dialog::None => Err(OrchestratorError::NoDialog),
            Dialog::Create(form) | Dialog::Edit(form) if form.is_submitting() => Err(OrchestratorError::Busy),
            _ => {
                debug!("Dialog cancelled");
                self.dialog = Dialog::None;
                Ok(())
            }
        }
    }

    fn on_create_finished(&mut self, result: Result<Repository, ClientError>) {
        match result {
            Ok(repo) => {
                let name = repo.name.clone();
                if self.store.insert(repo) == InsertOutcome::AlreadyPresent {
                    debug!("Created repository '{name}' was already listed");
                }
                if matches!(self.dialog, Dialog::Create(_)) {
                    self.dialog = Dialog::None;
                }
                self.notifications.push(Notification::success(SUCCESS_REPOSITORY_CREATED));
            }
            Err(e) => {
                warn!("Create failed: {e}");
                if let Dialog::Create(form) = &mut self.dialog {
                    form.phase = FormPhase::Drafting;
                    form.error = Some(e.clone());
                }
                self.notifications.push(Notification::failure(ERROR_CREATE_FAILED, &e));
            }
        }
    }

    fn on_update_finished(&mut self, target_id: RepoId, result: Result<Repository, ClientError>) {
        let is_current = matches!(&self.dialog, Dialog::Edit(form) if form.target_id == Some(target_id));
        match result {
            Ok(repo) => {
                let message = match self.store.update(target_id, &RepositoryPatch::from(&repo)) {
                    Ok(_) => SUCCESS_REPOSITORY_UPDATED,
                    Err(e) => {
                        warn!("Edited repository is no longer listed: {e}");
                        SUCCESS_REPOSITORY_UPDATED_UNLISTED
                    }
                };
                if is_current {
                    self.dialog = Dialog::None;
                }
                self.notifications.push(Notification::success(message));
            }
            Err(e) => {
                warn!("Update of {target_id} failed: {e}");
                if is_current {
                    if let Some(form) = self.dialog.form_mut() {
                        form.phase = FormPhase::Drafting;
                        form.error = Some(e.clone());
                    }
                }
                self.notifications.push(Notification::failure(ERROR_UPDATE_FAILED, &e));
            }
        }
    }
}
