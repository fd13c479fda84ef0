//! Quote domain model.
//!
//! # Responsibility
//! - Define the canonical quote record used by every component.
//! - Provide the built-in seed list used when no persisted data exists.
//!
//! # Invariants
//! - Quotes have no identity; equality is structural.
//! - Collections are append-only; there is no edit or delete path.

pub mod quote;
