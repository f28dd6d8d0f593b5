//! `LabStore`: the live, seeded connection shared by callers.

use super::{StoreError, StoreLocation, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::lab::{Lab, LabId};
use crate::model::subject::{Subject, SubjectId};
use crate::repo::lab_repo::SqliteLabRepository;
use crate::repo::subject_repo::SqliteSubjectRepository;
use crate::repo::RepoResult;
use crate::seed::{seed_if_needed, SeedOutcome};
use crate::service::catalog_service::{CatalogService, SubjectOverview};
use log::{debug, error, info};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

type SqliteCatalog<'conn> =
    CatalogService<SqliteSubjectRepository<'conn>, SqliteLabRepository<'conn>>;

/// Seeded store handle. `Send + Sync`; calls are serialized on one connection.
#[derive(Debug)]
pub struct LabStore {
    location: StoreLocation,
    conn: Mutex<Connection>,
}

impl LabStore {
    /// Opens the store at `location`, creating and seeding it on first use.
    ///
    /// Returns only after seeding has committed, so no caller can observe a
    /// partially seeded store.
    ///
    /// # Errors
    /// - `StorageUnavailable` when the directory or database cannot be
    ///   created, opened or migrated.
    /// - `SeedFailed` when first-run seeding fails.
    pub fn open(location: &StoreLocation) -> StoreResult<Self> {
        let started_at = Instant::now();
        info!("event=store_init module=store status=start location={location}");

        let mut conn = open_connection(location).inspect_err(|err| {
            error!(
                "event=store_init module=store status=error error_code={} error={err}",
                err.code()
            );
        })?;

        let outcome = seed_if_needed(&mut conn).map_err(|err| {
            error!(
                "event=store_init module=store status=error error_code=seed_failed error={err}"
            );
            StoreError::SeedFailed(err)
        })?;

        let seeded = matches!(outcome, SeedOutcome::Seeded { .. });
        info!(
            "event=store_init module=store status=ok seeded={seeded} duration_ms={}",
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            location: location.clone(),
            conn: Mutex::new(conn),
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// All subjects ordered by id.
    pub fn list_all_subjects(&self) -> StoreResult<Vec<Subject>> {
        self.with_catalog("list_all_subjects", |catalog| catalog.list_all_subjects())
    }

    /// Labs of one subject ordered by id; empty for an unknown subject.
    pub fn list_labs_for_subject(&self, subject_id: SubjectId) -> StoreResult<Vec<Lab>> {
        self.with_catalog("list_labs_for_subject", |catalog| {
            catalog.list_labs_for_subject(subject_id)
        })
    }

    pub fn get_subject(&self, id: SubjectId) -> StoreResult<Option<Subject>> {
        self.with_catalog("get_subject", |catalog| catalog.get_subject(id))
    }

    /// Inserts a subject. Never overwrites an existing id.
    pub fn add_subject(&self, subject: &Subject) -> StoreResult<SubjectId> {
        self.with_catalog("add_subject", |catalog| catalog.add_subject(subject))
    }

    /// Inserts a lab under an existing subject. Never overwrites an existing id.
    pub fn add_lab(&self, lab: &Lab) -> StoreResult<LabId> {
        self.with_catalog("add_lab", |catalog| catalog.add_lab(lab))
    }

    pub fn subject_overview(&self, id: SubjectId) -> StoreResult<Option<SubjectOverview>> {
        self.with_catalog("subject_overview", |catalog| catalog.subject_overview(id))
    }

    fn with_catalog<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&SqliteCatalog<'_>) -> RepoResult<T>,
    ) -> StoreResult<T> {
        let started_at = Instant::now();
        let conn = self.lock();

        let catalog = CatalogService::new(
            SqliteSubjectRepository::from_migrated(&conn),
            SqliteLabRepository::from_migrated(&conn),
        );
        let result = f(&catalog);

        match result {
            Ok(value) => {
                debug!(
                    "event=store_query module=store status=ok op={operation} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                let err = StoreError::from(err);
                error!(
                    "event=store_query module=store status=error op={operation} error_code={} error={err}",
                    err.code()
                );
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-call cannot leave the connection half-written: every
        // write is a single statement or a committed transaction.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn open_connection(location: &StoreLocation) -> StoreResult<Connection> {
    let opened = match location.db_path() {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    opened.map_err(|source| StoreError::StorageUnavailable {
        location: location.to_string(),
        source,
    })
}
