//! Utility modules shared across the crate.
//!
//! - [`datetime`] - Date formatting for repository timestamps

pub mod datetime;
