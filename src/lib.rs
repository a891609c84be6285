//! repodeck - browse and manage a user's GitHub repositories
//!
//! This library is the non-visual core of a repository browser. It fetches a
//! user's repositories from the GitHub REST API, keeps them in an in-memory
//! store, and sequences create, edit and delete actions against that store,
//! with client-side search and pagination over the result.
//!
//! # Modules
//!
//! * [`client`] - Remote collection client and its GitHub implementation
//! * [`store`] - In-memory collection with filtering and paging
//! * [`orchestrator`] - Dialog state machine driving user actions
//! * [`detail`] - Detail view loading
//! * [`route`] - Path routing
//! * [`config`] - Configuration loading and validation
//! * [`logger`] - Logging setup
//! * [`utils`] - Date formatting helpers

/// Remote collection client
pub mod client;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Repository detail view
pub mod detail;

/// Logging utilities for debugging and error tracking
pub mod logger;

/// User action sequencing
pub mod orchestrator;

/// Repository domain model
pub mod repository;

/// Path routing surface
pub mod route;

/// In-memory repository store
pub mod store;

/// Utility functions for date/time handling
pub mod utils;

pub use client::{ClientError, GitHubClient, RepositoryClient};
pub use orchestrator::{Action, Orchestrator};
pub use repository::{RepoId, Repository, RepositoryPatch, RepositoryStats};
pub use store::RepositoryStore;
