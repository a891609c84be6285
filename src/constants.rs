//! Constants used throughout the crate
//!
//! This module centralizes user-facing messages and default values.

// Success Messages
pub const SUCCESS_REPOSITORY_CREATED: &str = "✅ Repository created";
pub const SUCCESS_REPOSITORY_UPDATED: &str = "✅ Repository updated";
pub const SUCCESS_REPOSITORY_UPDATED_UNLISTED: &str = "✅ Repository updated (no longer in the list)";
pub const SUCCESS_REPOSITORY_DELETED: &str = "✅ Repository removed from the list";

// Error Messages
pub const ERROR_LOAD_FAILED: &str = "❌ Failed to load repositories";
pub const ERROR_CREATE_FAILED: &str = "❌ Failed to create repository";
pub const ERROR_UPDATE_FAILED: &str = "❌ Failed to update repository";
pub const ERROR_READ_ONLY: &str = "❌ Read-only mode: set a GitHub token to create or edit repositories";

// Validation Error Messages
pub const ERROR_EMPTY_NAME: &str = "repository name cannot be empty";
pub const ERROR_DUPLICATE_NAME: &str = "a repository with this name already exists";

// Detail view
pub const DETAIL_UNAVAILABLE: &str = "Repository details are unavailable";

// UI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

// HTTP
pub const USER_AGENT: &str = "repodeck";
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_USER: &str = "Arinzelight";
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Repositories requested per list page
pub const LIST_PER_PAGE: &str = "100";

// Limits
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
/// Maximum request timeout in seconds
pub const MAX_TIMEOUT_SECS: u64 = 120;
/// Default number of list pages followed during a load
pub const DEFAULT_MAX_LIST_PAGES: u32 = 10;
/// Maximum number of list pages followed during a load
pub const MAX_LIST_PAGES: u32 = 50;
/// Repositories shown per page in the list view
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Maximum list view page size
pub const MAX_PAGE_SIZE: usize = 100;
