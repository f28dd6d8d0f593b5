//! Core storage for the lab book: subjects, their lab assignments, and the
//! seeded SQLite store that holds them.
//! This crate is the single source of truth for data invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seed;
pub mod service;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::lab::{Lab, LabId, LabStatus};
pub use model::subject::{Subject, SubjectId};
pub use model::ModelValidationError;
pub use repo::lab_repo::{LabRepository, SqliteLabRepository};
pub use repo::subject_repo::{SqliteSubjectRepository, SubjectRepository};
pub use repo::{RepoError, RepoResult};
pub use seed::SeedOutcome;
pub use service::catalog_service::{CatalogService, SubjectOverview};
pub use store::{LabStore, StoreError, StoreLocation, StoreProvider, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
