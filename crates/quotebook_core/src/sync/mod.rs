//! Remote reconciliation: pull, push and periodic scheduling.
//!
//! # Responsibility
//! - Talk to the remote quote endpoint behind the `RemoteQuoteSource` SPI.
//! - Replace the local collection with reshaped remote data on pull.
//! - Push the full local collection after local mutations.
//!
//! # Invariants
//! - A failed pull never touches local state.
//! - Push failures are reported, never retried beyond the configured policy.
//! - Pull and push share no transaction; last completed write wins.

pub mod reconciler;
pub mod remote;
pub mod scheduler;

pub use reconciler::{reshape_remote_item, PullOutcome, Reconciler, RetryPolicy};
pub use remote::{HttpQuoteRemote, RemotePost, RemoteQuoteSource, SyncError, SyncResult};
pub use scheduler::PeriodicTask;
