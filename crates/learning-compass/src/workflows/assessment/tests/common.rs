use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::config::PaymentConfig;
use crate::workflows::assessment::domain::{
    Answer, Assessment, AssessmentId, ResponseSubmission, StudentId,
};
use crate::workflows::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::workflows::assessment::collector::ResponseCollector;
use crate::workflows::assessment::{assessment_router, AssessmentService, NewAssessment, Requester};
use crate::workflows::questions::{
    Category, Grade, GradeBand, OptionId, Question, QuestionBank, QuestionId, QuestionKind,
    QuestionOption,
};

/// Learning-style answers whose means are 4.2, 2.6, 2.6, 4.6, 3.2, and 1.8.
pub(super) const EXAMPLE_ANSWERS: [(Category, [u8; 5]); 6] = [
    (Category::Visual, [4, 5, 4, 3, 5]),
    (Category::Auditory, [3, 2, 3, 2, 3]),
    (Category::Kinesthetic, [2, 3, 2, 4, 2]),
    (Category::Logical, [5, 4, 5, 4, 5]),
    (Category::Social, [3, 3, 4, 3, 3]),
    (Category::Solitary, [2, 2, 1, 2, 2]),
];

pub(super) fn example_question_id(category: Category, index: usize) -> QuestionId {
    QuestionId(format!("ex-{}-{}", category.as_str(), index + 1))
}

pub(super) fn option_for(question_id: &QuestionId, value: u8) -> OptionId {
    OptionId(format!("{question_id}-{value}"))
}

fn scaled_question(id: QuestionId, category: Category, bands: &[GradeBand]) -> Question {
    let options = (1..=5u8)
        .map(|value| QuestionOption {
            id: option_for(&id, value),
            text: format!("{value}"),
            value: f64::from(value),
            impacts: BTreeMap::new(),
        })
        .collect();

    Question {
        prompt: format!("How much does {} describe you?", category.label()),
        id,
        category,
        kind: QuestionKind::SingleChoice,
        grade_bands: bands.to_vec(),
        options,
    }
}

/// Thirty elementary learning-style questions, five per category.
pub(super) fn example_bank() -> QuestionBank {
    let mut bank = QuestionBank::new();
    for (category, values) in EXAMPLE_ANSWERS {
        for index in 0..values.len() {
            bank.publish(scaled_question(
                example_question_id(category, index),
                category,
                &[GradeBand::Elementary],
            ))
            .expect("example question is valid");
        }
    }
    bank
}

pub(super) fn example_submissions(assessment_id: &AssessmentId) -> Vec<ResponseSubmission> {
    EXAMPLE_ANSWERS
        .iter()
        .flat_map(|(category, values)| {
            values.iter().enumerate().map(move |(index, value)| {
                let question_id = example_question_id(*category, index);
                ResponseSubmission {
                    assessment_id: assessment_id.clone(),
                    answer: Answer::Choice {
                        option_id: option_for(&question_id, *value),
                    },
                    question_id,
                    response_time_secs: Some(12),
                }
            })
        })
        .collect()
}

/// An in-progress assessment for `stu-1` holding the band's question set from `bank`.
pub(super) fn new_assessment(bank: &QuestionBank, grade: Grade) -> Assessment {
    let mut assessment = Assessment::new(
        AssessmentId("asm-test".to_string()),
        StudentId("stu-1".to_string()),
        grade,
        Utc::now(),
    );
    ResponseCollector::new(bank)
        .assign_question_set(&mut assessment)
        .expect("bank covers the grade");
    assessment
}

pub(super) type MemoryService = AssessmentService<MemoryRepository>;

pub(super) fn build_service(bank: QuestionBank) -> (MemoryService, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(repository.clone(), bank, PaymentConfig::default());
    (service, repository)
}

/// Starts and completes an elementary assessment for `stu-1` with the example answers.
pub(super) fn completed_example(service: &MemoryService) -> AssessmentId {
    let student = Requester::student("stu-1");
    let assessment = service
        .create_assessment(
            &student,
            NewAssessment {
                grade: Grade::G4,
                student_id: None,
            },
        )
        .expect("assessment starts");
    for submission in example_submissions(&assessment.id) {
        service
            .record_response(&student, submission)
            .expect("response recorded");
    }
    service
        .complete(&student, &assessment.id)
        .expect("assessment completes");
    assessment.id
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
}

impl MemoryRepository {
    pub(super) fn stored(&self, id: &AssessmentId) -> Option<Assessment> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .get(id)
            .cloned()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(assessment.id.clone(), assessment);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_for_student(&self, student_id: &StudentId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|assessment| &assessment.student_id == student_id)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _assessment: Assessment) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_student(&self, _student_id: &StudentId) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
