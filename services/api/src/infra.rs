use learning_compass::error::AppError;
use learning_compass::workflows::assessment::{
    Assessment, AssessmentId, AssessmentRepository, RepositoryError, StudentId,
};
use learning_compass::workflows::questions::{Grade, QuestionBank, QuestionBankImporter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    fn update(&self, assessment: Assessment) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.contains_key(&assessment.id) {
            guard.insert(assessment.id.clone(), assessment);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(id).cloned())
    }

    fn list_for_student(&self, student_id: &StudentId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut assessments: Vec<Assessment> = guard
            .values()
            .filter(|assessment| &assessment.student_id == student_id)
            .cloned()
            .collect();
        assessments.sort_by_key(|assessment| assessment.started_at);
        Ok(assessments)
    }
}

/// Built-in questionnaire plus any questions exported to `csv`.
pub(crate) fn load_question_bank(csv: Option<&Path>) -> Result<QuestionBank, AppError> {
    let mut bank = QuestionBank::standard();
    if let Some(path) = csv {
        let questions = QuestionBankImporter::from_path(path)?;
        let added = bank
            .extend(questions)
            .map_err(learning_compass::workflows::questions::QuestionImportError::from)?;
        tracing::info!(path = %path.display(), added, "question bank CSV loaded");
    }
    Ok(bank)
}

pub(crate) fn parse_grade(raw: &str) -> Result<Grade, String> {
    Grade::parse(raw).ok_or_else(|| format!("'{raw}' is not a grade (expected K or G1 through G12)"))
}
