use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::questions::{Grade, GradeBand, OptionId, QuestionId};

/// Identifier wrapper for assessment attempts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the student an assessment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    InProgress,
    Completed,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

/// What the student answered, tagged by question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    Choice { option_id: OptionId },
    FreeText { text: String },
}

/// One answer recorded against an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub question_id: QuestionId,
    pub answer: Answer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time_secs: Option<u32>,
    pub recorded_at: DateTime<Utc>,
}

/// Inbound payload for `POST /responses/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSubmission {
    pub assessment_id: AssessmentId,
    pub question_id: QuestionId,
    pub answer: Answer,
    #[serde(default)]
    pub response_time_secs: Option<u32>,
}

/// One answer inside a batch; the assessment id is carried by the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAnswer {
    pub question_id: QuestionId,
    pub answer: Answer,
    #[serde(default)]
    pub response_time_secs: Option<u32>,
}

/// Inbound payload for `POST /responses/batch/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBatch {
    pub assessment_id: AssessmentId,
    pub responses: Vec<BatchAnswer>,
}

impl ResponseBatch {
    pub fn into_submissions(self) -> Vec<ResponseSubmission> {
        let assessment_id = self.assessment_id;
        self.responses
            .into_iter()
            .map(|item| ResponseSubmission {
                assessment_id: assessment_id.clone(),
                question_id: item.question_id,
                answer: item.answer,
                response_time_secs: item.response_time_secs,
            })
            .collect()
    }
}

/// Inbound payload for `POST /assessments/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssessment {
    pub grade: Grade,
    #[serde(default)]
    pub student_id: Option<StudentId>,
}

/// Proof that the detailed report has been paid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub amount: u32,
    pub currency: String,
    pub paid_at: DateTime<Utc>,
}

/// Inbound payload for `POST /payments/{id}/confirm/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub transaction_id: String,
}

/// One questionnaire attempt by one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub student_id: StudentId,
    pub grade: Grade,
    pub status: AssessmentStatus,
    /// Question set assigned when the attempt started, in publication order.
    #[serde(default)]
    pub question_ids: Vec<QuestionId>,
    pub responses: Vec<Response>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
    pub payment: Option<PaymentReceipt>,
}

impl Assessment {
    pub fn new(id: AssessmentId, student_id: StudentId, grade: Grade, now: DateTime<Utc>) -> Self {
        Self {
            id,
            student_id,
            grade,
            status: AssessmentStatus::InProgress,
            question_ids: Vec::new(),
            responses: Vec::new(),
            started_at: now,
            completed_at: None,
            payment_status: PaymentStatus::Unpaid,
            payment: None,
        }
    }

    pub fn grade_band(&self) -> GradeBand {
        self.grade.band()
    }

    pub fn is_completed(&self) -> bool {
        self.status == AssessmentStatus::Completed
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub fn is_assigned(&self, question_id: &QuestionId) -> bool {
        self.question_ids.contains(question_id)
    }

    pub fn response_for(&self, question_id: &QuestionId) -> Option<&Response> {
        self.responses
            .iter()
            .find(|response| &response.question_id == question_id)
    }

    pub fn status_view(&self) -> AssessmentStatusView {
        AssessmentStatusView {
            assessment_id: self.id.clone(),
            student_id: self.student_id.clone(),
            grade: self.grade,
            grade_band: self.grade_band(),
            status: self.status,
            status_label: self.status.label(),
            answered: self.responses.len(),
            assigned: self.question_ids.len(),
            started_at: self.started_at,
            completed_at: self.completed_at,
            payment_status: self.payment_status,
        }
    }
}

/// Sanitized representation of an assessment's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub assessment_id: AssessmentId,
    pub student_id: StudentId,
    pub grade: Grade,
    pub grade_band: GradeBand,
    pub status: AssessmentStatus,
    pub status_label: &'static str,
    pub answered: usize,
    pub assigned: usize,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn answers_use_a_kind_tag() {
        let choice: Answer = serde_json::from_value(json!({
            "kind": "choice",
            "option_id": "q1-3"
        }))
        .expect("choice parses");
        assert_eq!(
            choice,
            Answer::Choice {
                option_id: OptionId("q1-3".to_string())
            }
        );

        let text = serde_json::to_value(Answer::FreeText {
            text: "I built a birdhouse".to_string(),
        })
        .expect("serializes");
        assert_eq!(text, json!({ "kind": "free_text", "text": "I built a birdhouse" }));
    }

    #[test]
    fn new_assessments_start_unpaid_and_in_progress() {
        let assessment = Assessment::new(
            AssessmentId("asm-1".to_string()),
            StudentId("stu-1".to_string()),
            Grade::G4,
            Utc::now(),
        );
        assert!(!assessment.is_completed());
        assert!(!assessment.is_paid());
        assert_eq!(assessment.grade_band(), GradeBand::Elementary);
        assert_eq!(assessment.status_view().status_label, "in progress");
    }
}
