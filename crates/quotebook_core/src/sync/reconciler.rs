//! Pull/push reconciliation between the local quote book and the remote.
//!
//! # Invariants
//! - Pull is `idle -> fetching -> {replaced | unchanged} -> idle`; nothing
//!   but the collection itself carries over between cycles.
//! - Fetching happens without holding the shared state lock.
//! - An empty reshaped pull leaves the local collection untouched.

use crate::model::quote::{Quote, QuoteCollection};
use crate::service::quote_book::QuoteBook;
use crate::sync::remote::{RemotePost, RemoteQuoteSource, SyncError, SyncResult};
use log::{info, warn};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Result of one successful pull cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Local collection was replaced with `count` remote quotes.
    Replaced { count: usize },
    /// Remote returned nothing usable; local state kept.
    Unchanged,
}

/// Attempt budget for remote calls.
///
/// The default performs a single attempt with no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            multiplier: 1,
        }
    }
}

impl RetryPolicy {
    pub fn exponential(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            multiplier: 2,
        }
    }

    fn run<T>(&self, op_name: &str, mut op: impl FnMut() -> SyncResult<T>) -> SyncResult<T> {
        let mut backoff = self.initial_backoff;
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && err.is_retryable() => {
                    warn!(
                        "event={op_name} module=sync status=retry attempt={attempt} backoff_ms={} error={err}",
                        backoff.as_millis()
                    );
                    thread::sleep(backoff);
                    backoff = backoff.saturating_mul(self.multiplier);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Turns one remote item into a quote.
///
/// `text` is the title; `category` is the first whitespace-delimited token of
/// the body, empty when the body has none.
pub fn reshape_remote_item(post: RemotePost) -> Quote {
    let category = post.body.split_whitespace().next().unwrap_or_default();
    Quote::new(post.title, category)
}

/// Coordinates remote pulls and pushes for a quote book.
pub struct Reconciler {
    remote: Arc<dyn RemoteQuoteSource>,
    retry: RetryPolicy,
}

impl Reconciler {
    pub fn new(remote: Arc<dyn RemoteQuoteSource>) -> Self {
        Self {
            remote,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetches and reshapes the remote collection without touching local state.
    pub fn fetch_quotes(&self) -> SyncResult<QuoteCollection> {
        let posts = self.retry.run("sync_pull", || self.remote.fetch())?;
        Ok(posts.into_iter().map(reshape_remote_item).collect())
    }

    /// Pulls into an exclusively borrowed book.
    pub fn pull(&self, book: &mut QuoteBook) -> SyncResult<PullOutcome> {
        let started_at = Instant::now();
        let fetched = self.fetch_logged(started_at)?;
        apply_pull(book, fetched, started_at)
    }

    /// Pulls into a book shared with other threads; the lock is held only
    /// while replacing.
    pub fn pull_shared(&self, book: &Mutex<QuoteBook>) -> SyncResult<PullOutcome> {
        let started_at = Instant::now();
        let fetched = self.fetch_logged(started_at)?;
        let mut guard = book.lock().map_err(|_| SyncError::StatePoisoned)?;
        apply_pull(&mut *guard, fetched, started_at)
    }

    /// Sends the full collection to the remote.
    pub fn push(&self, quotes: &[Quote]) -> SyncResult<()> {
        let started_at = Instant::now();
        match self.retry.run("sync_push", || self.remote.publish(quotes)) {
            Ok(()) => {
                info!(
                    "event=sync_push module=sync status=ok count={} duration_ms={}",
                    quotes.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=sync_push module=sync status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    fn fetch_logged(&self, started_at: Instant) -> SyncResult<QuoteCollection> {
        self.fetch_quotes().inspect_err(|err| {
            warn!(
                "event=sync_pull module=sync status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
        })
    }
}

fn apply_pull(
    book: &mut QuoteBook,
    fetched: QuoteCollection,
    started_at: Instant,
) -> SyncResult<PullOutcome> {
    if fetched.is_empty() {
        info!(
            "event=sync_pull module=sync status=unchanged duration_ms={}",
            started_at.elapsed().as_millis()
        );
        return Ok(PullOutcome::Unchanged);
    }

    let count = fetched.len();
    book.replace_all(fetched)?;
    info!(
        "event=sync_pull module=sync status=ok replaced={count} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(PullOutcome::Replaced { count })
}
