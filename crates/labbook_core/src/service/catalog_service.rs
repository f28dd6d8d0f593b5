//! Catalog use-case service over subjects and labs.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::model::lab::{Lab, LabId, LabStatus};
use crate::model::subject::{Subject, SubjectId};
use crate::repo::lab_repo::LabRepository;
use crate::repo::subject_repo::SubjectRepository;
use crate::repo::RepoResult;
use serde::Serialize;

/// Detail projection for one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectOverview {
    pub subject: Subject,
    /// Labs ordered by id.
    pub labs: Vec<Lab>,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
}

impl SubjectOverview {
    fn from_parts(subject: Subject, labs: Vec<Lab>) -> Self {
        let count = |status: LabStatus| labs.iter().filter(|lab| lab.status == status).count();
        Self {
            completed: count(LabStatus::Completed),
            in_progress: count(LabStatus::InProgress),
            not_started: count(LabStatus::NotStarted),
            subject,
            labs,
        }
    }

    /// `true` when the subject has labs and every one is completed.
    pub fn is_finished(&self) -> bool {
        !self.labs.is_empty() && self.completed == self.labs.len()
    }
}

/// Use-case service wrapper over subject and lab repositories.
pub struct CatalogService<S: SubjectRepository, L: LabRepository> {
    subjects: S,
    labs: L,
}

impl<S: SubjectRepository, L: LabRepository> CatalogService<S, L> {
    pub fn new(subjects: S, labs: L) -> Self {
        Self { subjects, labs }
    }

    pub fn list_all_subjects(&self) -> RepoResult<Vec<Subject>> {
        self.subjects.list_subjects()
    }

    pub fn get_subject(&self, id: SubjectId) -> RepoResult<Option<Subject>> {
        self.subjects.get_subject(id)
    }

    /// Labs of one subject; an unknown subject yields an empty list.
    pub fn list_labs_for_subject(&self, subject_id: SubjectId) -> RepoResult<Vec<Lab>> {
        self.labs.list_labs_for_subject(subject_id)
    }

    pub fn add_subject(&self, subject: &Subject) -> RepoResult<SubjectId> {
        self.subjects.create_subject(subject)
    }

    pub fn add_lab(&self, lab: &Lab) -> RepoResult<LabId> {
        self.labs.create_lab(lab)
    }

    /// Builds the detail view for one subject, or `None` if it is unknown.
    pub fn subject_overview(&self, id: SubjectId) -> RepoResult<Option<SubjectOverview>> {
        let Some(subject) = self.subjects.get_subject(id)? else {
            return Ok(None);
        };
        let labs = self.labs.list_labs_for_subject(id)?;
        Ok(Some(SubjectOverview::from_parts(subject, labs)))
    }
}
