//! Quote record and collection helpers.
//!
//! # Responsibility
//! - Define the `Quote` record and its wire shape (`text`, `category`).
//! - Validate user-entered quotes on the add path.
//!
//! # Invariants
//! - Quotes added through `Quote::validate()` have non-empty text and category.
//! - Imported or fetched quotes are shape-checked by deserialization only.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ordered quote collection. Order matters for listing and export only.
pub type QuoteCollection = Vec<Quote>;

/// One quote with its category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

/// Validation errors for user-entered quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
    EmptyCategory,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text must not be empty"),
            Self::EmptyCategory => write!(f, "quote category must not be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Checks the add-path invariant: both fields carry visible text.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.text.trim().is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        if self.category.trim().is_empty() {
            return Err(QuoteValidationError::EmptyCategory);
        }
        Ok(())
    }
}

impl Display for Quote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.category)
    }
}

/// Returns the built-in quotes used when durable storage holds nothing.
pub fn seed_quotes() -> QuoteCollection {
    vec![
        Quote::new(
            "The only limit to our realization of tomorrow is our doubts of today.",
            "Inspiration",
        ),
        Quote::new(
            "Life is 10% what happens to us and 90% how we react to it.",
            "Life",
        ),
        Quote::new(
            "The best way to predict the future is to invent it.",
            "Motivation",
        ),
    ]
}
