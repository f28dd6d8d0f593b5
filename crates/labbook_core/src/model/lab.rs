//! Lab assignment record.
//!
//! # Invariants
//! - `subject_id` points at an existing subject once persisted.
//! - Progress is a single tri-state `LabStatus`; storage keeps it as two
//!   flags that are never both set.

use super::subject::SubjectId;
use super::{validate_id, validate_title, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Caller-assigned lab identifier.
pub type LabId = i64;

/// Progress of a single lab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl LabStatus {
    /// Builds a status from the persisted `(is_completed, in_progress)` pair.
    pub fn from_flags(is_completed: bool, in_progress: bool) -> Result<Self, ModelValidationError> {
        match (is_completed, in_progress) {
            (false, false) => Ok(Self::NotStarted),
            (false, true) => Ok(Self::InProgress),
            (true, false) => Ok(Self::Completed),
            (true, true) => Err(ModelValidationError::ConflictingStatusFlags),
        }
    }

    /// Returns `(is_completed, in_progress)`.
    pub fn flags(self) -> (bool, bool) {
        match self {
            Self::NotStarted => (false, false),
            Self::InProgress => (false, true),
            Self::Completed => (true, false),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

/// An assignment belonging to exactly one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lab {
    pub id: LabId,
    pub subject_id: SubjectId,
    pub title: String,
    pub description: String,
    /// Free-form note; empty when absent.
    pub comment: String,
    #[serde(default)]
    pub status: LabStatus,
}

impl Lab {
    /// Creates a not-started lab with an empty comment.
    pub fn new(
        id: LabId,
        subject_id: SubjectId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            subject_id,
            title: title.into(),
            description: description.into(),
            comment: String::new(),
            status: LabStatus::NotStarted,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_status(mut self, status: LabStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == LabStatus::Completed
    }

    pub fn in_progress(&self) -> bool {
        self.status == LabStatus::InProgress
    }

    /// Checks id, owning subject id and title rules.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id("lab", self.id)?;
        validate_id("subject", self.subject_id)?;
        validate_title("lab", self.id, &self.title)
    }
}
