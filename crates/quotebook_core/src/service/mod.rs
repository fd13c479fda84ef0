//! Core use-case services.
//!
//! # Responsibility
//! - Implement selection, filtering and import/export over quote collections.
//! - Own the application state (`QuoteBook`) that host adapters call into.
//!
//! # Invariants
//! - Every mutation of the collection is persisted before returning.
//! - Services stay storage-agnostic; persistence goes through `QuoteStore`.

pub mod filter;
pub mod quote_book;
pub mod selector;
pub mod transfer;
