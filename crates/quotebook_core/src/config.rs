//! Configuration constants and runtime settings for quotebook.
//!
//! # Responsibility
//! - Group compile-time defaults by concern.
//! - Carry runtime overrides resolved by the host (CLI flags, environment).

use std::path::PathBuf;
use std::time::Duration;

/// Application metadata.
pub mod app {
    /// Application name, used for data directories and log file names.
    pub const NAME: &str = "quotebook";
}

/// Storage keys and file names.
pub mod storage {
    /// Durable slot holding the JSON-encoded quote collection.
    pub const QUOTES_KEY: &str = "quotes";
    /// Durable slot holding the plain selected-category string.
    pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
    /// Session slot holding the JSON-encoded last-shown quote.
    pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";
    /// SQLite database file name inside the data directory.
    pub const DB_FILE_NAME: &str = "quotebook.sqlite3";
    /// Default export file name.
    pub const EXPORT_FILE_NAME: &str = "quotes.json";
    /// Category value meaning "no filter".
    pub const ALL_CATEGORIES: &str = "all";
}

/// Remote sync defaults.
pub mod sync {
    /// Placeholder endpoint used for pull and push.
    pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
    /// Seconds between periodic pulls.
    pub const PULL_INTERVAL_SECS: u64 = 30;
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const READ_TIMEOUT_SECS: u64 = 20;
    pub const USER_AGENT: &str = concat!("quotebook/", env!("CARGO_PKG_VERSION"));
}

/// Runtime configuration resolved by the host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotebookConfig {
    /// Directory holding the database and log files.
    pub data_dir: PathBuf,
    /// Remote endpoint for pull and push.
    pub endpoint: String,
    /// Interval between background pulls.
    pub pull_interval: Duration,
}

impl QuotebookConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            endpoint: sync::DEFAULT_ENDPOINT.to_string(),
            pull_interval: Duration::from_secs(sync::PULL_INTERVAL_SECS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Path of the durable SQLite database.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(storage::DB_FILE_NAME)
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::{sync, QuotebookConfig};
    use std::time::Duration;

    #[test]
    fn defaults_use_placeholder_endpoint_and_thirty_second_interval() {
        let config = QuotebookConfig::new("/tmp/quotebook");
        assert_eq!(config.endpoint, sync::DEFAULT_ENDPOINT);
        assert_eq!(config.pull_interval, Duration::from_secs(30));
        assert!(config.db_path().ends_with("quotebook.sqlite3"));
    }

    #[test]
    fn with_endpoint_overrides_default() {
        let config = QuotebookConfig::new("/tmp/q").with_endpoint("http://localhost:9/posts");
        assert_eq!(config.endpoint, "http://localhost:9/posts");
    }
}
