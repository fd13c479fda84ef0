//! Quote store: typed slots over durable and session storage.
//!
//! # Responsibility
//! - Load/save the quote collection from the durable `quotes` slot.
//! - Persist the selected category (durable) and last-shown quote (session).
//!
//! # Invariants
//! - `load` never fails on bad stored data: absent or blank yields the seed
//!   list, malformed JSON is logged and yields the seed list.
//! - `save` overwrites the slot wholesale.

use crate::config::storage::{
    ALL_CATEGORIES, LAST_VIEWED_KEY, QUOTES_KEY, SELECTED_CATEGORY_KEY,
};
use crate::model::quote::{seed_quotes, Quote, QuoteCollection};
use crate::repo::kv_repo::{KeyValueStorage, StorageResult};
use log::{debug, warn};

/// Quote persistence over a durable and a session key-value backend.
pub struct QuoteStore {
    durable: Box<dyn KeyValueStorage>,
    session: Box<dyn KeyValueStorage>,
}

impl QuoteStore {
    pub fn new(durable: Box<dyn KeyValueStorage>, session: Box<dyn KeyValueStorage>) -> Self {
        Self { durable, session }
    }

    /// Reads the persisted collection, falling back to the seed list.
    pub fn load(&self) -> StorageResult<QuoteCollection> {
        let Some(raw) = non_blank(self.durable.get(QUOTES_KEY)?) else {
            debug!("event=store_load module=store status=ok source=seed");
            return Ok(seed_quotes());
        };

        match serde_json::from_str::<QuoteCollection>(&raw) {
            Ok(quotes) => {
                debug!(
                    "event=store_load module=store status=ok source=durable count={}",
                    quotes.len()
                );
                Ok(quotes)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=fallback source=seed error_code=malformed_quotes error={err}"
                );
                Ok(seed_quotes())
            }
        }
    }

    /// Serializes and overwrites the durable collection slot.
    pub fn save(&self, quotes: &[Quote]) -> StorageResult<()> {
        let encoded = serde_json::to_string(quotes)?;
        self.durable.set(QUOTES_KEY, &encoded)?;
        debug!(
            "event=store_save module=store status=ok count={}",
            quotes.len()
        );
        Ok(())
    }

    /// Returns the persisted category selection, `"all"` when unset.
    pub fn load_selected_category(&self) -> StorageResult<String> {
        Ok(non_blank(self.durable.get(SELECTED_CATEGORY_KEY)?)
            .unwrap_or_else(|| ALL_CATEGORIES.to_string()))
    }

    pub fn save_selected_category(&self, category: &str) -> StorageResult<()> {
        self.durable.set(SELECTED_CATEGORY_KEY, category)
    }

    /// Returns the quote last shown in this session, if any.
    pub fn load_last_shown(&self) -> StorageResult<Option<Quote>> {
        let Some(raw) = non_blank(self.session.get(LAST_VIEWED_KEY)?) else {
            return Ok(None);
        };

        match serde_json::from_str::<Quote>(&raw) {
            Ok(quote) => Ok(Some(quote)),
            Err(err) => {
                warn!(
                    "event=session_load module=store status=fallback error_code=malformed_last_viewed error={err}"
                );
                Ok(None)
            }
        }
    }

    pub fn save_last_shown(&self, quote: &Quote) -> StorageResult<()> {
        let encoded = serde_json::to_string(quote)?;
        self.session.set(LAST_VIEWED_KEY, &encoded)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}
