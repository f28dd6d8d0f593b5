//! Subject repository contract and SQLite implementation.

use super::{ensure_connection_ready, map_insert_error, RepoError, RepoResult};
use crate::model::subject::{Subject, SubjectId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SUBJECT_SELECT_SQL: &str = "SELECT id, title FROM subjects";

/// Repository interface for subject rows.
pub trait SubjectRepository {
    /// Inserts one subject; fails with `DuplicateId` when the id is taken.
    fn create_subject(&self, subject: &Subject) -> RepoResult<SubjectId>;
    fn get_subject(&self, id: SubjectId) -> RepoResult<Option<Subject>>;
    /// Lists every subject ordered by `id ASC`.
    fn list_subjects(&self) -> RepoResult<Vec<Subject>>;
    fn subject_exists(&self, id: SubjectId) -> RepoResult<bool>;
}

/// SQLite-backed subject repository.
pub struct SqliteSubjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubjectRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self::from_migrated(conn))
    }

    /// Skips the readiness check for connections opened through `open_db`.
    pub(crate) fn from_migrated(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SubjectRepository for SqliteSubjectRepository<'_> {
    fn create_subject(&self, subject: &Subject) -> RepoResult<SubjectId> {
        subject.validate()?;

        if self.subject_exists(subject.id)? {
            return Err(RepoError::DuplicateId {
                entity: "subject",
                id: subject.id,
            });
        }

        self.conn
            .execute(
                "INSERT INTO subjects (id, title) VALUES (?1, ?2);",
                params![subject.id, subject.title.as_str()],
            )
            .map_err(|err| map_insert_error(err, "subject", subject.id))?;

        Ok(subject.id)
    }

    fn get_subject(&self, id: SubjectId) -> RepoResult<Option<Subject>> {
        let row = self
            .conn
            .query_row(
                &format!("{SUBJECT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(read_subject_row(row)),
            )
            .optional()?;

        row.transpose()
    }

    fn list_subjects(&self) -> RepoResult<Vec<Subject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBJECT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();

        while let Some(row) = rows.next()? {
            subjects.push(read_subject_row(row)?);
        }

        Ok(subjects)
    }

    fn subject_exists(&self, id: SubjectId) -> RepoResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM subjects WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

fn read_subject_row(row: &Row<'_>) -> RepoResult<Subject> {
    let subject = Subject {
        id: row.get("id")?,
        title: row.get("title")?,
    };
    subject.validate().map_err(|err| {
        RepoError::InvalidData(format!("subjects row {} failed validation: {err}", subject.id))
    })?;
    Ok(subject)
}
