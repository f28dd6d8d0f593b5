//! Subject (course) record.

use super::{validate_id, validate_title, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Caller-assigned subject identifier.
pub type SubjectId = i64;

/// A course owning zero or more labs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub title: String,
}

impl Subject {
    pub fn new(id: SubjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }

    /// Checks id and title rules.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        validate_id("subject", self.id)?;
        validate_title("subject", self.id, &self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::Subject;
    use crate::model::ModelValidationError;

    #[test]
    fn validate_rejects_zero_id_and_blank_title() {
        assert_eq!(
            Subject::new(0, "Algebra").validate(),
            Err(ModelValidationError::NonPositiveId {
                entity: "subject",
                id: 0
            })
        );
        assert_eq!(
            Subject::new(3, "   ").validate(),
            Err(ModelValidationError::EmptyTitle {
                entity: "subject",
                id: 3
            })
        );
        assert!(Subject::new(1, "Algebra").validate().is_ok());
    }
}
