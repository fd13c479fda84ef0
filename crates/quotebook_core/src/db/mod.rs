//! SQLite file backing the durable key-value slots.
//!
//! # Responsibility
//! - Open file-backed or in-memory connections with the `kv_entries` table
//!   in place.
//!
//! # Invariants
//! - The `kv_entries` schema revision is stored in `PRAGMA user_version`.
//! - A file written by a newer quotebook build is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;

pub use open::{open_db, open_db_in_memory, SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file carries a `kv_entries` revision this build does not know.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "quote database error: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "quote database uses key-value schema v{found}; this build reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
