//! GitHub implementation of [`RepositoryClient`].

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;

use super::models::{error_message, ApiOwner, ApiRepository, RepositoryPayload};
use super::paging::next_link;
use super::{validate_name, ClientError, CreateRepositoryArgs, RepositoryClient, UpdateRepositoryArgs};
use crate::config::GitHubConfig;
use crate::constants::{LIST_PER_PAGE, USER_AGENT};
use crate::repository::Repository;

/// Talks to the GitHub REST API.
///
/// Without a token the client runs in anonymous mode: listing and detail
/// fetches use the public endpoints of the configured user, and writes are
/// refused before any request is made. With a token, detail fetches are
/// addressed to the token's own account and writes to each repository's owner.
pub struct GitHubClient {
    http: Client,
    base_url: Url,
    user: String,
    token: Option<String>,
    max_list_pages: u32,
    /// Login of the token's account, fetched on first use
    account: OnceCell<String>,
}

impl GitHubClient {
    /// Build a client from configuration, reading the token from the environment.
    pub fn new(config: &GitHubConfig) -> Result<Self, ClientError> {
        Self::with_token(config, config.token())
    }

    /// Build a client with an explicit token (`None` for anonymous mode).
    pub fn with_token(config: &GitHubConfig, token: Option<String>) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ClientError::Validation(format!("invalid API base URL '{}': {e}", config.api_base_url)))?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let token = token.filter(|t| !t.trim().is_empty());

        info!(
            "GitHub client for '{}' at {} ({})",
            config.user,
            base_url,
            if token.is_some() { "authenticated" } else { "anonymous" }
        );

        Ok(Self {
            http,
            base_url,
            user: config.user.clone(),
            token,
            max_list_pages: config.max_list_pages,
            account: OnceCell::new(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Validation(format!("API base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header("Accept", "application/vnd.github+json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn require_token(&self, operation: &str) -> Result<(), ClientError> {
        if self.token.is_none() {
            return Err(ClientError::Auth(format!(
                "a GitHub token is required to {operation} (running in read-only mode)"
            )));
        }
        Ok(())
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response, ClientError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body, status.canonical_reason().unwrap_or("request failed"));
        warn!("GitHub {what} failed with {status}: {message}");
        Err(ClientError::from_status(status.as_u16(), message))
    }

    /// Account that owns the listed repositories.
    async fn owner(&self) -> Result<&str, ClientError> {
        if self.token.is_none() {
            return Ok(self.user.as_str());
        }
        let login = self
            .account
            .get_or_try_init(|| async {
                let url = self.endpoint(&["user"])?;
                let response = self.send(self.request(Method::GET, url), "resolve account").await?;
                let account: ApiOwner = decode(response).await?;
                debug!("Token belongs to '{}'", account.login);
                Ok::<_, ClientError>(account.login)
            })
            .await?;
        Ok(login.as_str())
    }

    fn list_url(&self) -> Result<Url, ClientError> {
        let mut url = if self.token.is_some() {
            let mut url = self.endpoint(&["user", "repos"])?;
            url.query_pairs_mut().append_pair("affiliation", "owner");
            url
        } else {
            self.endpoint(&["users", self.user.as_str(), "repos"])?
        };
        url.query_pairs_mut().append_pair("per_page", LIST_PER_PAGE);
        Ok(url)
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Network("request timed out".to_string())
    } else {
        ClientError::Network(err.to_string())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Upstream {
        status: None,
        message: format!("unexpected response shape: {e}"),
    })
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    fn can_write(&self) -> bool {
        self.token.is_some()
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>, ClientError> {
        let mut url = self.list_url()?;
        let mut repos = Vec::new();

        for page in 1..=self.max_list_pages {
            debug!("Fetching repositories page {page}: {url}");
            let response = self.send(self.request(Method::GET, url), "list repositories").await?;
            let next = next_link(response.headers());
            let payload: Vec<ApiRepository> = decode(response).await?;
            repos.extend(payload.into_iter().map(Repository::from));

            match next {
                Some(link) => {
                    url = Url::parse(&link).map_err(|e| ClientError::Upstream {
                        status: None,
                        message: format!("invalid pagination link '{link}': {e}"),
                    })?;
                }
                None => break,
            }
            if page == self.max_list_pages {
                warn!("Stopped listing after {page} pages; remaining repositories are not loaded");
            }
        }

        info!("Fetched {} repositories", repos.len());
        Ok(repos)
    }

    async fn get_repository(&self, name: &str) -> Result<Repository, ClientError> {
        validate_name(name)?;
        let owner = self.owner().await?;
        let url = self.endpoint(&["repos", owner, name])?;
        let response = self.send(self.request(Method::GET, url), "get repository").await?;
        let repo: ApiRepository = decode(response).await?;
        Ok(repo.into())
    }

    async fn create_repository(&self, args: CreateRepositoryArgs) -> Result<Repository, ClientError> {
        self.require_token("create repositories")?;
        validate_name(&args.name)?;

        let url = self.endpoint(&["user", "repos"])?;
        let payload = RepositoryPayload {
            name: args.name.trim(),
            description: args.description.as_deref(),
        };
        let response = self
            .send(self.request(Method::POST, url).json(&payload), "create repository")
            .await?;
        let repo: Repository = decode::<ApiRepository>(response).await?.into();
        info!("Created repository '{}' ({})", repo.name, repo.id);
        Ok(repo)
    }

    async fn update_repository(
        &self,
        target: &Repository,
        args: UpdateRepositoryArgs,
    ) -> Result<Repository, ClientError> {
        self.require_token("edit repositories")?;
        validate_name(&args.name)?;

        let url = self.endpoint(&["repos", target.owner.as_str(), target.name.as_str()])?;
        let payload = RepositoryPayload {
            name: args.name.trim(),
            description: args.description.as_deref(),
        };
        let response = self
            .send(self.request(Method::PATCH, url).json(&payload), "update repository")
            .await?;
        let repo: Repository = decode::<ApiRepository>(response).await?.into();
        if repo.id != target.id {
            return Err(ClientError::Upstream {
                status: None,
                message: format!("update of {} returned repository {}", target.id, repo.id),
            });
        }
        info!("Updated repository {} -> '{}'", repo.id, repo.name);
        Ok(repo)
    }
}
