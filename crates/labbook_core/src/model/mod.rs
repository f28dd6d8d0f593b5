//! Domain model for subjects and their lab assignments.
//!
//! # Responsibility
//! - Define the records persisted in `subjects` and `subject_labs`.
//! - Own the validation rules every write and read-back must pass.
//!
//! # Invariants
//! - Ids are caller-assigned and strictly positive.
//! - Titles are never blank.
//! - A lab is never both completed and in progress.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod lab;
pub mod subject;

/// Validation failure for subject/lab records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Ids must be `> 0`.
    NonPositiveId { entity: &'static str, id: i64 },
    /// Title is empty or whitespace only.
    EmptyTitle { entity: &'static str, id: i64 },
    /// `is_completed` and `in_progress` were both set.
    ConflictingStatusFlags,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveId { entity, id } => {
                write!(f, "{entity} id must be positive, got {id}")
            }
            Self::EmptyTitle { entity, id } => write!(f, "{entity} {id} has an empty title"),
            Self::ConflictingStatusFlags => {
                write!(f, "lab cannot be completed and in progress at the same time")
            }
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn validate_id(entity: &'static str, id: i64) -> Result<(), ModelValidationError> {
    if id <= 0 {
        return Err(ModelValidationError::NonPositiveId { entity, id });
    }
    Ok(())
}

pub(crate) fn validate_title(
    entity: &'static str,
    id: i64,
    title: &str,
) -> Result<(), ModelValidationError> {
    if title.trim().is_empty() {
        return Err(ModelValidationError::EmptyTitle { entity, id });
    }
    Ok(())
}
