//! Live lab store handle and its one-time provider.
//!
//! # Responsibility
//! - Create, seed and hand out the single store used by the application.
//! - Surface storage, seed and query failures as `StoreError`.
//!
//! # Invariants
//! - A `LabStore` is fully seeded before any caller can observe it.
//! - A `StoreProvider` initializes at most one store, even under concurrent
//!   first calls.

use crate::db::DbError;
use crate::model::subject::SubjectId;
use crate::model::ModelValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod handle;
mod provider;

pub use handle::LabStore;
pub use provider::StoreProvider;

/// Fixed file name of the store inside its data directory.
pub const DB_FILE_NAME: &str = "lab4_database.sqlite3";

pub type StoreResult<T> = Result<T, StoreError>;

/// Where a store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// On-disk store at `<dir>/lab4_database.sqlite3`.
    Directory(PathBuf),
    /// Private in-memory store, discarded with the handle.
    InMemory,
}

impl StoreLocation {
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self::Directory(dir.into())
    }

    /// Database file path, or `None` for in-memory stores.
    pub fn db_path(&self) -> Option<PathBuf> {
        match self {
            Self::Directory(dir) => Some(dir.join(DB_FILE_NAME)),
            Self::InMemory => None,
        }
    }
}

impl Display for StoreLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.db_path() {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, ":memory:"),
        }
    }
}

/// Error returned by store handle and provider operations.
#[derive(Debug)]
pub enum StoreError {
    /// Store file or directory could not be opened, created or migrated.
    StorageUnavailable { location: String, source: DbError },
    /// First-run seeding failed; nothing was committed.
    SeedFailed(RepoError),
    /// A read or write failed below the semantic level.
    QueryFailed(RepoError),
    /// Insert reused an existing id.
    DuplicateId { entity: &'static str, id: i64 },
    /// Lab insert referenced a subject that does not exist.
    UnknownSubject(SubjectId),
    /// Record rejected before reaching storage.
    Validation(ModelValidationError),
}

impl StoreError {
    /// Stable machine-readable code for logs and callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable { .. } => "storage_unavailable",
            Self::SeedFailed(_) => "seed_failed",
            Self::QueryFailed(_) => "query_failed",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::UnknownSubject(_) => "unknown_subject",
            Self::Validation(_) => "validation_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable { location, source } => {
                write!(f, "lab store unavailable at `{location}`: {source}")
            }
            Self::SeedFailed(err) => write!(f, "seeding lab store failed: {err}"),
            Self::QueryFailed(err) => write!(f, "lab store query failed: {err}"),
            Self::DuplicateId { entity, id } => write!(f, "{entity} with id {id} already exists"),
            Self::UnknownSubject(id) => write!(f, "subject not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable { source, .. } => Some(source),
            Self::SeedFailed(err) | Self::QueryFailed(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::DuplicateId { .. } | Self::UnknownSubject(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateId { entity, id } => Self::DuplicateId { entity, id },
            RepoError::UnknownSubject(id) => Self::UnknownSubject(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::QueryFailed(other),
        }
    }
}
