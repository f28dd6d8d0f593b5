//! Repository contracts and SQLite implementations for subjects and labs.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Translate SQLite failures into semantic errors (`DuplicateId`,
//!   `UnknownSubject`) callers can branch on.
//!
//! # Invariants
//! - Writes validate the record before touching SQL.
//! - Reads reject invalid persisted rows instead of masking them.
//! - Inserts never overwrite: a reused id is an error.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::subject::SubjectId;
use crate::model::ModelValidationError;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod lab_repo;
pub mod subject_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for subject/lab persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    /// Insert reused an existing primary key.
    DuplicateId { entity: &'static str, id: i64 },
    /// Lab references a subject that does not exist.
    UnknownSubject(SubjectId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId { entity, id } => write!(f, "{entity} with id {id} already exists"),
            Self::UnknownSubject(id) => write!(f, "subject not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: expected schema version {expected_version}, found {actual_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

const REQUIRED_TABLES: &[&str] = &["subjects", "subject_labs", "store_meta"];

/// Rejects connections that did not go through `open_db`.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in REQUIRED_TABLES {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

/// Maps a primary-key collision to `DuplicateId`; other failures pass through.
pub(crate) fn map_insert_error(err: rusqlite::Error, entity: &'static str, id: i64) -> RepoError {
    if let rusqlite::Error::SqliteFailure(code, _) = &err {
        let pk_collision = code.code == ErrorCode::ConstraintViolation
            && matches!(
                code.extended_code,
                rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_ROWID
            );
        if pk_collision {
            return RepoError::DuplicateId { entity, id };
        }
    }
    err.into()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}
