//! Remote quote endpoint SPI and its HTTP implementation.
//!
//! # Responsibility
//! - Define the fetch/publish contract the reconciler depends on.
//! - Implement it over a blocking `reqwest` client with fixed timeouts.
//!
//! # Invariants
//! - The remote is untrusted: fetched items must deserialize as objects
//!   with string `title` and `body` fields, anything else is a decode error.
//! - Publish ignores the response body; only the status is checked.

use crate::config::sync::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, USER_AGENT};
use crate::model::quote::Quote;
use crate::repo::kv_repo::StorageError;
use crate::service::quote_book::QuoteBookError;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub type SyncResult<T> = Result<T, SyncError>;

/// Remote sync failures.
#[derive(Debug)]
pub enum SyncError {
    /// Transport failure: DNS, connect, timeout, body read.
    Http(reqwest::Error),
    /// Remote answered with a non-2xx status.
    Status(u16),
    /// Response body is not the expected JSON shape.
    Decode(serde_json::Error),
    /// Applying pulled data locally failed.
    Local(QuoteBookError),
    /// Shared application state was poisoned by a panicking holder.
    StatePoisoned,
}

impl SyncError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status(code) => *code >= 500 || *code == 429,
            Self::Decode(_) | Self::Local(_) | Self::StatePoisoned => false,
        }
    }
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "remote request failed: {err}"),
            Self::Status(code) => write!(f, "remote returned status {code}"),
            Self::Decode(err) => write!(f, "remote payload is malformed: {err}"),
            Self::Local(err) => write!(f, "failed to apply remote quotes: {err}"),
            Self::StatePoisoned => write!(f, "quote state lock poisoned"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Local(err) => Some(err),
            Self::Status(_) | Self::StatePoisoned => None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<QuoteBookError> for SyncError {
    fn from(value: QuoteBookError) -> Self {
        Self::Local(value)
    }
}

impl From<StorageError> for SyncError {
    fn from(value: StorageError) -> Self {
        Self::Local(QuoteBookError::Storage(value))
    }
}

/// One item of the remote collection; extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemotePost {
    pub title: String,
    pub body: String,
}

/// Remote collection endpoint.
pub trait RemoteQuoteSource: Send + Sync {
    /// Fetches the remote collection.
    fn fetch(&self) -> SyncResult<Vec<RemotePost>>;

    /// Sends the full local collection.
    fn publish(&self, quotes: &[Quote]) -> SyncResult<()>;
}

/// `RemoteQuoteSource` over HTTP GET/POST to one endpoint.
pub struct HttpQuoteRemote {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpQuoteRemote {
    pub fn new(endpoint: impl Into<String>) -> SyncResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RemoteQuoteSource for HttpQuoteRemote {
    fn fetch(&self) -> SyncResult<Vec<RemotePost>> {
        let response = self.client.get(&self.endpoint).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        let body = response.text()?;
        serde_json::from_str(&body).map_err(SyncError::Decode)
    }

    fn publish(&self, quotes: &[Quote]) -> SyncResult<()> {
        let response = self.client.post(&self.endpoint).json(quotes).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status.as_u16()));
        }
        Ok(())
    }
}
