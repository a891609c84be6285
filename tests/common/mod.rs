#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use repodeck::client::{ClientError, CreateRepositoryArgs, RepositoryClient, UpdateRepositoryArgs};
use repodeck::repository::{RepoId, Repository, RepositoryStats};

pub fn repo(id: u64, name: &str) -> Repository {
    Repository {
        id: RepoId(id),
        name: name.to_string(),
        owner: "octocat".to_string(),
        description: None,
        language: Some("Rust".to_string()),
        html_url: format!("https://github.com/octocat/{name}"),
        updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        stats: None,
    }
}

pub fn numbered_repos(count: u64) -> Vec<Repository> {
    (1..=count).map(|i| repo(i, &format!("repo-{i:02}"))).collect()
}

/// In-memory stand-in for the GitHub API that records every call.
pub struct FakeClient {
    remote: Mutex<Vec<Repository>>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<ClientError>>,
    writable: bool,
    delay: Option<Duration>,
    next_id: AtomicU64,
}

impl FakeClient {
    pub fn new(remote: Vec<Repository>) -> Self {
        Self {
            remote: Mutex::new(remote),
            calls: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            writable: true,
            delay: None,
            next_id: AtomicU64::new(1000),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: ClientError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Drop a repository from the server side only.
    pub fn remove_remote(&self, id: RepoId) {
        self.remote.lock().unwrap().retain(|repo| repo.id != id);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RepositoryClient for FakeClient {
    fn can_write(&self) -> bool {
        self.writable
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>, ClientError> {
        self.enter("list".to_string()).await?;
        Ok(self.remote.lock().unwrap().clone())
    }

    async fn get_repository(&self, name: &str) -> Result<Repository, ClientError> {
        self.enter(format!("get {name}")).await?;
        self.remote
            .lock()
            .unwrap()
            .iter()
            .find(|repo| repo.name == name)
            .cloned()
            .map(|mut repo| {
                repo.stats = Some(RepositoryStats {
                    forks_count: 1,
                    stargazers_count: 5,
                    watchers_count: 5,
                    open_issues_count: 2,
                });
                repo
            })
            .ok_or_else(|| ClientError::NotFound(format!("{name} not found")))
    }

    async fn create_repository(&self, args: CreateRepositoryArgs) -> Result<Repository, ClientError> {
        self.enter(format!("create {}", args.name)).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut created = repo(id, &args.name);
        created.description = args.description;
        created.language = None;
        self.remote.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_repository(
        &self,
        target: &Repository,
        args: UpdateRepositoryArgs,
    ) -> Result<Repository, ClientError> {
        self.enter(format!("update {}", target.id)).await?;
        let mut remote = self.remote.lock().unwrap();
        let existing = remote
            .iter_mut()
            .find(|repo| repo.id == target.id)
            .ok_or_else(|| ClientError::NotFound(format!("{} not found", target.name)))?;
        existing.name = args.name;
        existing.description = args.description.filter(|d| !d.is_empty());
        Ok(existing.clone())
    }
}
