//! In-memory repository collection.
//!
//! The store keeps repositories in the order the server returned them and
//! never re-sorts. Searching and paging are pure functions over a slice so a
//! view can recompute them on every render without touching the store.

use log::debug;

use crate::repository::{RepoId, Repository, RepositoryPatch};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Repository {0} not found")]
    NotFound(RepoId),
}

/// Result of [`RepositoryStore::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

/// Authoritative client-side view of the repository collection.
#[derive(Debug, Default, Clone)]
pub struct RepositoryStore {
    repos: Vec<Repository>,
}

/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<'a> {
    pub items: Vec<&'a Repository>,
    /// The requested page, 1-based
    pub page: usize,
    pub page_count: usize,
    /// Number of repositories matching the query across all pages
    pub total_matches: usize,
}

impl RepositoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection. Repeated ids keep their first occurrence.
    pub fn replace_all(&mut self, repos: Vec<Repository>) {
        let incoming = repos.len();
        self.repos.clear();
        for repo in repos {
            if self.position(repo.id).is_none() {
                self.repos.push(repo);
            }
        }
        if self.repos.len() != incoming {
            debug!("Dropped {} duplicate repositories on load", incoming - self.repos.len());
        }
    }

    /// Append a repository unless its id is already known.
    pub fn insert(&mut self, repo: Repository) -> InsertOutcome {
        if self.position(repo.id).is_some() {
            return InsertOutcome::AlreadyPresent;
        }
        self.repos.push(repo);
        InsertOutcome::Inserted
    }

    /// Replace name and description of the repository with `id`.
    pub fn update(&mut self, id: RepoId, patch: &RepositoryPatch) -> Result<&Repository, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        let repo = &mut self.repos[index];
        repo.apply(patch);
        Ok(repo)
    }

    /// Remove the repository with `id`, returning it.
    pub fn remove(&mut self, id: RepoId) -> Result<Repository, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        Ok(self.repos.remove(index))
    }

    pub fn get(&self, id: RepoId) -> Option<&Repository> {
        self.repos.iter().find(|repo| repo.id == id)
    }

    /// Look up by exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&Repository> {
        self.repos.iter().find(|repo| repo.name == name)
    }

    /// Whether another repository already uses `name`. Names compare
    /// case-insensitively; `except` is skipped so an edit can keep its own name.
    pub fn name_taken(&self, name: &str, except: Option<RepoId>) -> bool {
        let name = name.trim().to_lowercase();
        self.repos
            .iter()
            .filter(|repo| Some(repo.id) != except)
            .any(|repo| repo.name.to_lowercase() == name)
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        self.repos.iter()
    }

    pub fn as_slice(&self) -> &[Repository] {
        &self.repos
    }

    /// Filter by `query` and cut out one page.
    pub fn page(&self, query: &str, page: usize, page_size: usize) -> PageSlice<'_> {
        let matches = filter(&self.repos, query);
        PageSlice {
            items: paginate(&matches, page, page_size).to_vec(),
            page,
            page_count: page_count(matches.len(), page_size),
            total_matches: matches.len(),
        }
    }

    fn position(&self, id: RepoId) -> Option<usize> {
        self.repos.iter().position(|repo| repo.id == id)
    }
}

/// Repositories whose name contains `query`, ignoring case, in original order.
pub fn filter<'a>(repos: &'a [Repository], query: &str) -> Vec<&'a Repository> {
    let needle = query.to_lowercase();
    repos.iter().filter(|repo| repo.name_matches(&needle)).collect()
}

/// The 1-based `page` of `seq`. Out-of-range pages are empty.
pub fn paginate<T>(seq: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= seq.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(seq.len());
    &seq[start..end]
}

/// Number of pages needed for `len` items; zero when there is nothing to show.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_clamps_out_of_range() {
        let seq: Vec<u32> = (1..=5).collect();
        assert_eq!(paginate(&seq, 1, 2), &[1, 2]);
        assert_eq!(paginate(&seq, 3, 2), &[5]);
        assert!(paginate(&seq, 4, 2).is_empty());
        assert!(paginate(&seq, 0, 2).is_empty());
        assert!(paginate(&seq, 1, 0).is_empty());
        assert!(paginate(&seq, usize::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(23, 10), 3);
        assert_eq!(page_count(5, 0), 0);
    }
}
