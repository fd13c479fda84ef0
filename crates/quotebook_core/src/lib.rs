//! Core domain logic for quotebook.
//! This crate owns every quote invariant; hosts only adapt input and output.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::QuotebookConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::quote::{seed_quotes, Quote, QuoteCollection, QuoteValidationError};
pub use repo::kv_repo::{
    KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StorageError, StorageResult,
};
pub use repo::quote_store::QuoteStore;
pub use service::quote_book::{QuoteBook, QuoteBookError, QuoteBookResult};
pub use service::transfer::TransferError;
pub use sync::{
    HttpQuoteRemote, PeriodicTask, PullOutcome, Reconciler, RemotePost, RemoteQuoteSource,
    RetryPolicy, SyncError, SyncResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
