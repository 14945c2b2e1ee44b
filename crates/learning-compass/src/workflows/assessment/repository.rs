use super::domain::{Assessment, AssessmentId, StudentId};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    fn list_for_student(&self, student_id: &StudentId) -> Result<Vec<Assessment>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
