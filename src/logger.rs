//! Logging setup.
//!
//! Code logs through the `log` macros. [`init`] installs a `fern` dispatch
//! that keeps every record in an in-memory [`Logger`] (for a debug panel) and
//! optionally echoes it to stderr.

use anyhow::Result;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::config::LoggingConfig;

/// Oldest entries are dropped past this many lines
const MAX_ENTRIES: usize = 1000;

/// Shared logger that can be used across the application
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<VecDeque<String>>>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_ENTRIES))),
        }
    }

    /// Add a log entry
    pub fn log(&self, message: String) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {}", timestamp, message);

        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() >= MAX_ENTRIES {
                logs.pop_front();
            }
            logs.push_back(formatted_message);
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the global `log` dispatcher.
///
/// Returns `Ok(false)` when a global logger was already installed, which
/// happens when several tests or embedders initialize logging.
pub fn init(config: &LoggingConfig, logger: &Logger) -> Result<bool> {
    let level = config.level_filter()?;
    let sink = logger.clone();

    let memory = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("{:<5} {}: {}", record.level(), record.target(), message))
        })
        .chain(fern::Output::call(move |record| sink.log(record.args().to_string())));

    let mut root = fern::Dispatch::new().level(level).chain(memory);

    if config.enabled {
        root = root.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "[{}] {:<5} {}: {}",
                        Utc::now().format("%H:%M:%S%.3f"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(std::io::stderr()),
        );
    }

    Ok(root.apply().is_ok())
}
