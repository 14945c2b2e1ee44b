use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::domain::{Answer, Assessment, AssessmentId, AssessmentStatus, Response, ResponseSubmission};
use crate::workflows::questions::{
    Grade, GradeBand, OptionId, QuestionBank, QuestionId, QuestionKind,
};

/// Longest free-text answer accepted, in characters.
pub const MAX_FREE_TEXT_CHARS: usize = 4_000;

/// Client-correctable problems, each tied to the request field at fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("assessment {0} is already completed")]
    AssessmentClosed(AssessmentId),
    #[error("assessment {0} is not completed yet")]
    NotCompleted(AssessmentId),
    #[error("question {0} does not exist")]
    UnknownQuestion(QuestionId),
    #[error("question {question_id} is not part of the {} question set", .band.as_str())]
    OutsideGradeBand {
        question_id: QuestionId,
        band: GradeBand,
    },
    #[error("question {0} is already answered")]
    AlreadyAnswered(QuestionId),
    #[error("question {question_id} expects a {} answer", .expected.label())]
    AnswerKindMismatch {
        question_id: QuestionId,
        expected: QuestionKind,
    },
    #[error("option {option_id} is not an option of question {question_id}")]
    UnknownOption {
        question_id: QuestionId,
        option_id: OptionId,
    },
    #[error("free-text answer to question {0} is blank")]
    BlankFreeText(QuestionId),
    #[error("free-text answer to question {0} exceeds {max} characters", max = MAX_FREE_TEXT_CHARS)]
    FreeTextTooLong(QuestionId),
    #[error("{} question(s) remain unanswered", .missing.len())]
    IncompleteResponses { missing: Vec<QuestionId> },
    #[error("responses reference questions outside the assigned set: {}", join_ids(.unexpected))]
    UnexpectedResponses { unexpected: Vec<QuestionId> },
    #[error("no questions are published for grade {0}")]
    NoQuestionsForGrade(Grade),
    #[error("a student id is required")]
    MissingStudent,
    #[error("response batch is empty")]
    EmptyBatch,
    #[error("{0}")]
    InvalidQuestion(String),
    #[error("transaction id must not be blank")]
    MissingTransaction,
}

impl ValidationError {
    /// Request field the error refers to, surfaced as field-level detail.
    pub fn field(&self) -> &'static str {
        match self {
            Self::AssessmentClosed(_) | Self::NotCompleted(_) => "assessment_id",
            Self::UnknownQuestion(_) | Self::OutsideGradeBand { .. } | Self::AlreadyAnswered(_) => {
                "question_id"
            }
            Self::AnswerKindMismatch { .. } => "answer",
            Self::UnknownOption { .. } => "answer.option_id",
            Self::BlankFreeText(_) | Self::FreeTextTooLong(_) => "answer.text",
            Self::IncompleteResponses { .. } | Self::UnexpectedResponses { .. } | Self::EmptyBatch => {
                "responses"
            }
            Self::NoQuestionsForGrade(_) => "grade",
            Self::MissingStudent => "student_id",
            Self::InvalidQuestion(_) => "question",
            Self::MissingTransaction => "transaction_id",
        }
    }

    /// Question ids the caller should look at, when the error names several.
    pub fn question_ids(&self) -> &[QuestionId] {
        match self {
            Self::IncompleteResponses { missing } => missing,
            Self::UnexpectedResponses { unexpected } => unexpected,
            _ => &[],
        }
    }
}

fn join_ids(ids: &[QuestionId]) -> String {
    ids.iter()
        .map(|id| id.0.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validates and records answers against the question set assigned to an assessment.
pub struct ResponseCollector<'a> {
    bank: &'a QuestionBank,
}

impl<'a> ResponseCollector<'a> {
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    pub fn record(
        &self,
        assessment: &mut Assessment,
        submission: ResponseSubmission,
        now: DateTime<Utc>,
    ) -> Result<Response, ValidationError> {
        if assessment.is_completed() {
            return Err(ValidationError::AssessmentClosed(assessment.id.clone()));
        }

        let question = self
            .bank
            .get(&submission.question_id)
            .ok_or_else(|| ValidationError::UnknownQuestion(submission.question_id.clone()))?;

        if !assessment.is_assigned(&question.id) {
            return Err(ValidationError::OutsideGradeBand {
                question_id: question.id.clone(),
                band: assessment.grade_band(),
            });
        }

        if assessment.response_for(&question.id).is_some() {
            return Err(ValidationError::AlreadyAnswered(question.id.clone()));
        }

        let answer = match (question.kind, submission.answer) {
            (QuestionKind::SingleChoice, Answer::Choice { option_id }) => {
                if question.option(&option_id).is_none() {
                    return Err(ValidationError::UnknownOption {
                        question_id: question.id.clone(),
                        option_id,
                    });
                }
                Answer::Choice { option_id }
            }
            (QuestionKind::FreeText, Answer::FreeText { text }) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::BlankFreeText(question.id.clone()));
                }
                if trimmed.chars().count() > MAX_FREE_TEXT_CHARS {
                    return Err(ValidationError::FreeTextTooLong(question.id.clone()));
                }
                Answer::FreeText {
                    text: trimmed.to_string(),
                }
            }
            (expected, _) => {
                return Err(ValidationError::AnswerKindMismatch {
                    question_id: question.id.clone(),
                    expected,
                })
            }
        };

        let response = Response {
            question_id: question.id.clone(),
            answer,
            response_time_secs: submission.response_time_secs,
            recorded_at: now,
        };
        assessment.responses.push(response.clone());
        Ok(response)
    }

    /// Snapshots the band's current question set onto a new assessment.
    ///
    /// Questions published later never join an attempt that has already started.
    pub fn assign_question_set(&self, assessment: &mut Assessment) -> Result<(), ValidationError> {
        let question_ids: Vec<QuestionId> = self
            .bank
            .for_band(assessment.grade_band())
            .into_iter()
            .map(|question| question.id.clone())
            .collect();
        if question_ids.is_empty() {
            return Err(ValidationError::NoQuestionsForGrade(assessment.grade));
        }
        assessment.question_ids = question_ids;
        Ok(())
    }

    /// Assigned questions the assessment has not answered yet, in question-set order.
    pub fn missing_questions(&self, assessment: &Assessment) -> Vec<QuestionId> {
        assessment
            .question_ids
            .iter()
            .filter(|question_id| assessment.response_for(question_id).is_none())
            .cloned()
            .collect()
    }

    /// Closes the assessment once its responses cover exactly the assigned question set.
    pub fn finalize(
        &self,
        assessment: &mut Assessment,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if assessment.is_completed() {
            return Err(ValidationError::AssessmentClosed(assessment.id.clone()));
        }

        let missing = self.missing_questions(assessment);
        if !missing.is_empty() {
            return Err(ValidationError::IncompleteResponses { missing });
        }

        let assigned: HashSet<&QuestionId> = assessment.question_ids.iter().collect();
        let unexpected: Vec<QuestionId> = assessment
            .responses
            .iter()
            .filter(|response| !assigned.contains(&response.question_id))
            .map(|response| response.question_id.clone())
            .collect();
        if !unexpected.is_empty() {
            return Err(ValidationError::UnexpectedResponses { unexpected });
        }

        assessment.status = AssessmentStatus::Completed;
        assessment.completed_at = Some(now);
        Ok(())
    }
}
