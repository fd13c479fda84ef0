//! Storage layer: key-value backends and the quote store on top of them.
//!
//! # Responsibility
//! - Define the key-value contract that both durable and session storage meet.
//! - Keep SQLite and JSON encoding details out of the service layer.
//!
//! # Invariants
//! - Writes overwrite; there is no merge at this layer.
//! - Malformed stored JSON is reported through logs and replaced by a
//!   fallback value, never surfaced as a hard failure.

pub mod kv_repo;
pub mod quote_store;
