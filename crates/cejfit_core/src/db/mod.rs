//! SQLite storage bootstrap, schema migration and first-run seeding.
//!
//! # Responsibility
//! - Open and configure the single SQLite file backing the workout log.
//! - Apply schema migrations in deterministic order.
//! - Insert the starter exercise list on first run.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Connections handed out have `foreign_keys=ON`, so deletes cascade
//!   exercise -> sessions -> sets.
//! - No application data is read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod seed;

pub use open::{open_db, open_db_in_memory};
pub use seed::{seed_starter_exercises, STARTER_EXERCISES};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or seeding the database.
#[derive(Debug)]
pub enum DbError {
    /// Database directory could not be created.
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "database directory is not accessible: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Returns whether `err` is SQLite rejecting a `UNIQUE` constraint.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}
