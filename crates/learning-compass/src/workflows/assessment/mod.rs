//! Assessment lifecycle: start, answer, complete, score, recommend, report, and pay.

pub mod access;
pub(crate) mod collector;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use access::{Requester, RequesterRejection, Role, ROLE_HEADER, STUDENT_HEADER};
pub use collector::{ResponseCollector, ValidationError, MAX_FREE_TEXT_CHARS};
pub use domain::{
    Answer, Assessment, AssessmentId, AssessmentStatus, AssessmentStatusView, BatchAnswer,
    NewAssessment, PaymentConfirmation, PaymentReceipt, PaymentStatus, Response, ResponseBatch,
    ResponseSubmission, StudentId,
};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use service::{
    AssessmentResults, AssessmentService, AssessmentServiceError, PaymentStatusView, StudentHistory,
};
