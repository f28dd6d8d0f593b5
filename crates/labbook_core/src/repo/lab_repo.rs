//! Lab repository contract and SQLite implementation.
//!
//! # Invariants
//! - `is_completed`/`in_progress` columns round-trip through `LabStatus`.
//! - A lab can only be inserted under an existing subject.

use super::{
    bool_to_int, ensure_connection_ready, int_to_bool, map_insert_error, RepoError, RepoResult,
};
use crate::model::lab::{Lab, LabId, LabStatus};
use crate::model::subject::SubjectId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const LAB_SELECT_SQL: &str = "SELECT
    id,
    subject_id,
    title,
    description,
    comment,
    is_completed,
    in_progress
FROM subject_labs";

/// Repository interface for lab rows.
pub trait LabRepository {
    /// Inserts one lab; fails with `DuplicateId` or `UnknownSubject`.
    fn create_lab(&self, lab: &Lab) -> RepoResult<LabId>;
    fn get_lab(&self, id: LabId) -> RepoResult<Option<Lab>>;
    /// Lists labs of one subject ordered by `id ASC`.
    fn list_labs_for_subject(&self, subject_id: SubjectId) -> RepoResult<Vec<Lab>>;
    /// Lists every lab ordered by `id ASC`.
    fn list_labs(&self) -> RepoResult<Vec<Lab>>;
}

/// SQLite-backed lab repository.
pub struct SqliteLabRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLabRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self::from_migrated(conn))
    }

    /// Skips the readiness check for connections opened through `open_db`.
    pub(crate) fn from_migrated(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_labs(&self, sql: &str, subject_id: Option<SubjectId>) -> RepoResult<Vec<Lab>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match subject_id {
            Some(id) => stmt.query([id])?,
            None => stmt.query([])?,
        };
        let mut labs = Vec::new();

        while let Some(row) = rows.next()? {
            labs.push(read_lab_row(row)?);
        }

        Ok(labs)
    }
}

impl LabRepository for SqliteLabRepository<'_> {
    fn create_lab(&self, lab: &Lab) -> RepoResult<LabId> {
        lab.validate()?;

        let lab_taken: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM subject_labs WHERE id = ?1);",
            [lab.id],
            |row| row.get(0),
        )?;
        if lab_taken {
            return Err(RepoError::DuplicateId {
                entity: "lab",
                id: lab.id,
            });
        }

        let subject_known: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM subjects WHERE id = ?1);",
            [lab.subject_id],
            |row| row.get(0),
        )?;
        if !subject_known {
            return Err(RepoError::UnknownSubject(lab.subject_id));
        }

        let (is_completed, in_progress) = lab.status.flags();
        self.conn
            .execute(
                "INSERT INTO subject_labs (
                    id,
                    subject_id,
                    title,
                    description,
                    comment,
                    is_completed,
                    in_progress
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    lab.id,
                    lab.subject_id,
                    lab.title.as_str(),
                    lab.description.as_str(),
                    lab.comment.as_str(),
                    bool_to_int(is_completed),
                    bool_to_int(in_progress),
                ],
            )
            .map_err(|err| map_insert_error(err, "lab", lab.id))?;

        Ok(lab.id)
    }

    fn get_lab(&self, id: LabId) -> RepoResult<Option<Lab>> {
        let row = self
            .conn
            .query_row(&format!("{LAB_SELECT_SQL} WHERE id = ?1;"), [id], |row| {
                Ok(read_lab_row(row))
            })
            .optional()?;

        row.transpose()
    }

    fn list_labs_for_subject(&self, subject_id: SubjectId) -> RepoResult<Vec<Lab>> {
        self.query_labs(
            &format!("{LAB_SELECT_SQL} WHERE subject_id = ?1 ORDER BY id ASC;"),
            Some(subject_id),
        )
    }

    fn list_labs(&self) -> RepoResult<Vec<Lab>> {
        self.query_labs(&format!("{LAB_SELECT_SQL} ORDER BY id ASC;"), None)
    }
}

fn read_lab_row(row: &Row<'_>) -> RepoResult<Lab> {
    let id: LabId = row.get("id")?;
    let is_completed = int_to_bool(row.get("is_completed")?, "subject_labs.is_completed")?;
    let in_progress = int_to_bool(row.get("in_progress")?, "subject_labs.in_progress")?;
    let status = LabStatus::from_flags(is_completed, in_progress).map_err(|err| {
        RepoError::InvalidData(format!("subject_labs row {id}: {err}"))
    })?;

    let lab = Lab {
        id,
        subject_id: row.get("subject_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        comment: row.get("comment")?,
        status,
    };
    lab.validate().map_err(|err| {
        RepoError::InvalidData(format!("subject_labs row {id} failed validation: {err}"))
    })?;
    Ok(lab)
}
