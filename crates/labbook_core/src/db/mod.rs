//! Storage bootstrap for the lab store.
//!
//! `open_db` creates the file (and its directory) when missing, turns on
//! foreign keys, then brings the schema up to `migrations::latest_version()`.
//! Nothing above this module touches a connection that failed either step.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Why a connection could not be produced.
#[derive(Debug)]
pub enum DbError {
    /// Directory for the database file could not be created.
    Io { path: PathBuf, source: io::Error },
    /// SQLite refused to open, configure or migrate the database.
    Sqlite(rusqlite::Error),
    /// File was written by a newer binary.
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

impl DbError {
    /// Short tag used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "db_dir_unavailable",
            Self::Sqlite(_) => "db_sqlite_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot prepare directory `{}`: {source}", path.display())
            }
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "lab store schema v{found} is newer than this build understands (v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
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
