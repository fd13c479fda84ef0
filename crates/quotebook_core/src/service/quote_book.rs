//! Application state shared by every host adapter.
//!
//! # Responsibility
//! - Own the in-memory collection, the category selection and the store.
//! - Expose the user-level operations: draw, add, filter, import, export.
//!
//! # Invariants
//! - Every collection mutation is saved to durable storage before returning.
//! - Failed validation or a failed import leaves state untouched.
//! - Network pushes are not issued here; callers hand the collection to the
//!   reconciler and decide how to report push failures.

use crate::model::quote::{Quote, QuoteCollection, QuoteValidationError};
use crate::repo::kv_repo::{KeyValueStorage, StorageError};
use crate::repo::quote_store::QuoteStore;
use crate::service::filter;
use crate::service::selector::pick_random;
use crate::service::transfer::{self, TransferError};
use log::info;
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type QuoteBookResult<T> = Result<T, QuoteBookError>;

#[derive(Debug)]
pub enum QuoteBookError {
    Validation(QuoteValidationError),
    Storage(StorageError),
    Transfer(TransferError),
}

impl Display for QuoteBookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Transfer(err) => write!(f, "{err}"),
        }
    }
}

impl Error for QuoteBookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Transfer(err) => Some(err),
        }
    }
}

impl From<QuoteValidationError> for QuoteBookError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for QuoteBookError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<TransferError> for QuoteBookError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}

/// Quote collection plus its persisted view state.
pub struct QuoteBook {
    store: QuoteStore,
    quotes: QuoteCollection,
    selected: String,
}

impl QuoteBook {
    /// Loads the collection and restores the previous category selection.
    pub fn open(
        durable: Box<dyn KeyValueStorage>,
        session: Box<dyn KeyValueStorage>,
    ) -> QuoteBookResult<Self> {
        let store = QuoteStore::new(durable, session);
        let quotes = store.load()?;
        let selected = store.load_selected_category()?;
        info!(
            "event=book_open module=service status=ok count={} selected={}",
            quotes.len(),
            selected
        );
        Ok(Self {
            store,
            quotes,
            selected,
        })
    }

    /// Full collection in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn selected_category(&self) -> &str {
        &self.selected
    }

    /// Distinct categories of the full collection.
    pub fn categories(&self) -> Vec<String> {
        filter::categories(&self.quotes)
    }

    /// Quotes visible under the current selection.
    pub fn active_view(&self) -> Vec<&Quote> {
        filter::active_view(&self.quotes, &self.selected)
    }

    /// Changes and persists the category selection.
    pub fn set_selected_category(&mut self, category: impl Into<String>) -> QuoteBookResult<()> {
        let category = category.into();
        self.store.save_selected_category(&category)?;
        self.selected = category;
        Ok(())
    }

    /// Draws a random quote from the active view and records it as last shown.
    ///
    /// Returns `Ok(None)` when the view is empty.
    pub fn show_random<R: Rng + ?Sized>(&self, rng: &mut R) -> QuoteBookResult<Option<Quote>> {
        let view = self.active_view();
        let Some(picked) = pick_random(&view, rng).map(|quote| (*quote).clone()) else {
            return Ok(None);
        };
        self.store.save_last_shown(&picked)?;
        Ok(Some(picked))
    }

    /// Quote recorded by the latest draw in this session.
    pub fn last_shown(&self) -> QuoteBookResult<Option<Quote>> {
        Ok(self.store.load_last_shown()?)
    }

    /// Validates and appends a user-entered quote; returns the stored copy.
    pub fn add_quote(
        &mut self,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> QuoteBookResult<Quote> {
        let quote = Quote::new(text, category);
        quote.validate()?;
        self.append(vec![quote.clone()])?;
        info!(
            "event=quote_add module=service status=ok count={}",
            self.quotes.len()
        );
        Ok(quote)
    }

    /// Appends every quote of an import document; returns how many were added.
    pub fn import_json(&mut self, text: &str) -> QuoteBookResult<usize> {
        let imported = transfer::parse_import(text)?;
        self.import_quotes(imported)
    }

    /// Reads and appends an import file.
    pub fn import_file(&mut self, path: &Path) -> QuoteBookResult<usize> {
        let imported = transfer::read_import(path)?;
        self.import_quotes(imported)
    }

    /// Pretty JSON of the full collection, ignoring the filter.
    pub fn export_json(&self) -> QuoteBookResult<String> {
        Ok(transfer::export_json(&self.quotes)?)
    }

    pub fn export_file(&self, path: &Path) -> QuoteBookResult<()> {
        Ok(transfer::write_export(path, &self.quotes)?)
    }

    /// Wholesale replacement used by remote pulls.
    pub fn replace_all(&mut self, quotes: QuoteCollection) -> QuoteBookResult<()> {
        self.store.save(&quotes)?;
        self.quotes = quotes;
        Ok(())
    }

    fn import_quotes(&mut self, imported: QuoteCollection) -> QuoteBookResult<usize> {
        let added = imported.len();
        self.append(imported)?;
        info!(
            "event=quote_import module=service status=ok added={} count={}",
            added,
            self.quotes.len()
        );
        Ok(added)
    }

    fn append(&mut self, additions: QuoteCollection) -> QuoteBookResult<()> {
        let mut next = self.quotes.clone();
        next.extend(additions);
        self.store.save(&next)?;
        self.quotes = next;
        Ok(())
    }
}
