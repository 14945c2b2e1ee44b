use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::access::Requester;
use super::collector::{ResponseCollector, ValidationError};
use super::domain::{
    Assessment, AssessmentId, AssessmentStatusView, NewAssessment, PaymentConfirmation,
    PaymentReceipt, PaymentStatus, Response, ResponseBatch, ResponseSubmission, StudentId,
};
use super::repository::{AssessmentRepository, RepositoryError};
use super::scoring::{
    AssessmentScoring, FreeTextScorer, IdealEnvironment, IgnoreFreeText, ScoringView,
};
use crate::config::PaymentConfig;
use crate::workflows::questions::{Grade, GradeBand, PublishError, Question, QuestionBank, QuestionId};
use crate::workflows::recommendation::{RecommendationMapper, RecommendationRecord};
use crate::workflows::report::{RenderedReport, ReportData, ReportFormatter};

/// Service composing the question bank, response collector, scoring pipeline, and reports.
pub struct AssessmentService<R, S = IgnoreFreeText> {
    repository: Arc<R>,
    free_text: Arc<S>,
    bank: RwLock<QuestionBank>,
    recommendations: RecommendationMapper,
    payment: PaymentConfig,
    // Held across fetch-modify-update so concurrent writes cannot drop each other's changes.
    writes: Mutex<()>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asm-{id:06}"))
}

impl<R> AssessmentService<R, IgnoreFreeText>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>, bank: QuestionBank, payment: PaymentConfig) -> Self {
        Self::with_free_text_scorer(repository, Arc::new(IgnoreFreeText), bank, payment)
    }
}

impl<R, S> AssessmentService<R, S>
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    pub fn with_free_text_scorer(
        repository: Arc<R>,
        free_text: Arc<S>,
        bank: QuestionBank,
        payment: PaymentConfig,
    ) -> Self {
        Self {
            repository,
            free_text,
            bank: RwLock::new(bank),
            recommendations: RecommendationMapper::standard(),
            payment,
            writes: Mutex::new(()),
        }
    }

    pub fn payment_config(&self) -> &PaymentConfig {
        &self.payment
    }

    fn bank(&self) -> RwLockReadGuard<'_, QuestionBank> {
        self.bank.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn bank_mut(&self) -> RwLockWriteGuard<'_, QuestionBank> {
        self.bank.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Published questions, optionally narrowed to one grade's band.
    pub fn questions(&self, grade: Option<Grade>) -> Vec<Question> {
        let bank = self.bank();
        match grade {
            Some(grade) => bank.for_band(grade.band()).into_iter().cloned().collect(),
            None => bank.all().to_vec(),
        }
    }

    pub fn publish_question(
        &self,
        requester: &Requester,
        question: Question,
    ) -> Result<Question, AssessmentServiceError> {
        if !requester.can_publish_questions() {
            return Err(AssessmentServiceError::Forbidden(
                "only administrators may publish questions",
            ));
        }

        let mut bank = self.bank_mut();
        let published = bank.publish(question).map_err(|err| match err {
            PublishError::AlreadyPublished(id) => AssessmentServiceError::QuestionConflict(id),
            PublishError::Invalid(invalid) => {
                AssessmentServiceError::Validation(ValidationError::InvalidQuestion(
                    invalid.to_string(),
                ))
            }
        })?;

        tracing::info!(
            question_id = %published.id,
            category = %published.category,
            "question published"
        );
        Ok(published.clone())
    }

    /// Start an assessment for the requester's student (or any student, for staff).
    pub fn create_assessment(
        &self,
        requester: &Requester,
        request: NewAssessment,
    ) -> Result<Assessment, AssessmentServiceError> {
        let student_id = self.resolve_student(requester, request.student_id)?;

        let mut assessment =
            Assessment::new(next_assessment_id(), student_id, request.grade, Utc::now());
        ResponseCollector::new(&self.bank()).assign_question_set(&mut assessment)?;
        let stored = self.repository.insert(assessment)?;

        tracing::info!(
            assessment_id = %stored.id,
            student_id = %stored.student_id,
            grade = %stored.grade,
            band = stored.grade_band().as_str(),
            questions = stored.question_ids.len(),
            "assessment started"
        );
        Ok(stored)
    }

    fn resolve_student(
        &self,
        requester: &Requester,
        requested: Option<StudentId>,
    ) -> Result<StudentId, AssessmentServiceError> {
        let student_id = if requester.role.is_staff() {
            requested.ok_or(ValidationError::MissingStudent)?
        } else {
            let own = requester
                .student_id
                .clone()
                .ok_or(AssessmentServiceError::Forbidden("requester is not linked to a student"))?;
            if requested.as_ref().is_some_and(|requested| requested != &own) {
                return Err(AssessmentServiceError::Forbidden(
                    "assessments can only be started for the linked student",
                ));
            }
            own
        };

        if student_id.0.trim().is_empty() {
            return Err(ValidationError::MissingStudent.into());
        }
        Ok(student_id)
    }

    fn load(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<Assessment, AssessmentServiceError> {
        let assessment = self
            .repository
            .fetch(assessment_id)?
            .ok_or_else(|| AssessmentServiceError::NotFound(assessment_id.clone()))?;

        if !requester.can_access(&assessment) {
            tracing::warn!(
                assessment_id = %assessment_id,
                role = requester.role.as_str(),
                "requester denied access to assessment"
            );
            return Err(AssessmentServiceError::Forbidden(
                "requester may not access this assessment",
            ));
        }
        Ok(assessment)
    }

    fn load_completed(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<Assessment, AssessmentServiceError> {
        let assessment = self.load(requester, assessment_id)?;
        if !assessment.is_completed() {
            return Err(ValidationError::NotCompleted(assessment.id).into());
        }
        Ok(assessment)
    }

    pub fn status(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentStatusView, AssessmentServiceError> {
        Ok(self.load(requester, assessment_id)?.status_view())
    }

    /// Question set assigned to the assessment when it started.
    pub fn assessment_questions(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<Vec<Question>, AssessmentServiceError> {
        let assessment = self.load(requester, assessment_id)?;
        let bank = self.bank();
        Ok(assessment
            .question_ids
            .iter()
            .filter_map(|question_id| bank.get(question_id).cloned())
            .collect())
    }

    pub fn record_response(
        &self,
        requester: &Requester,
        submission: ResponseSubmission,
    ) -> Result<Response, AssessmentServiceError> {
        let _writes = self.write_lock();
        let mut assessment = self.load(requester, &submission.assessment_id)?;
        let response = {
            let bank = self.bank();
            ResponseCollector::new(&bank).record(&mut assessment, submission, Utc::now())?
        };
        self.repository.update(assessment)?;

        tracing::debug!(question_id = %response.question_id, "response recorded");
        Ok(response)
    }

    /// Records every answer in the batch or none of them; the first invalid answer is reported.
    pub fn record_batch(
        &self,
        requester: &Requester,
        batch: ResponseBatch,
    ) -> Result<Vec<Response>, AssessmentServiceError> {
        if batch.responses.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }

        let _writes = self.write_lock();
        let mut assessment = self.load(requester, &batch.assessment_id)?;
        let recorded = {
            let bank = self.bank();
            let collector = ResponseCollector::new(&bank);
            let now = Utc::now();
            batch
                .into_submissions()
                .into_iter()
                .map(|submission| collector.record(&mut assessment, submission, now))
                .collect::<Result<Vec<_>, _>>()?
        };
        self.repository.update(assessment)?;

        tracing::debug!(count = recorded.len(), "response batch recorded");
        Ok(recorded)
    }

    /// Close the assessment and return its freshly computed results.
    pub fn complete(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentResults, AssessmentServiceError> {
        let _writes = self.write_lock();
        let mut assessment = self.load(requester, assessment_id)?;
        let results = {
            let bank = self.bank();
            ResponseCollector::new(&bank).finalize(&mut assessment, Utc::now())?;
            AssessmentResults::compute(&bank, self.free_text.as_ref(), &assessment)
        };
        self.repository.update(assessment)?;

        tracing::info!(
            assessment_id = %assessment_id,
            primary_style = results.primary_style().map(|category| category.as_str()),
            "assessment completed"
        );
        Ok(results)
    }

    /// Scores and classifications, recomputed from the stored responses on every call.
    pub fn results(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentResults, AssessmentServiceError> {
        let assessment = self.load_completed(requester, assessment_id)?;
        let bank = self.bank();
        Ok(AssessmentResults::compute(&bank, self.free_text.as_ref(), &assessment))
    }

    /// Completed assessments of one student, most recently completed first.
    pub fn student_history(
        &self,
        requester: &Requester,
        student_id: &StudentId,
    ) -> Result<StudentHistory, AssessmentServiceError> {
        if !requester.can_view_student(student_id) {
            tracing::warn!(
                student_id = %student_id,
                role = requester.role.as_str(),
                "requester denied access to student history"
            );
            return Err(AssessmentServiceError::Forbidden(
                "requester may not access this student's assessments",
            ));
        }

        let mut completed: Vec<Assessment> = self
            .repository
            .list_for_student(student_id)?
            .into_iter()
            .filter(Assessment::is_completed)
            .collect();
        completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

        let bank = self.bank();
        let assessments = completed
            .iter()
            .map(|assessment| AssessmentResults::compute(&bank, self.free_text.as_ref(), assessment))
            .collect();
        Ok(StudentHistory {
            student_id: student_id.clone(),
            assessments,
        })
    }

    pub fn recommendations(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<RecommendationRecord, AssessmentServiceError> {
        let assessment = self.load_completed(requester, assessment_id)?;
        let scoring = self.scoring(&assessment);
        Ok(self.recommend(&assessment, &scoring))
    }

    pub fn summary_report(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<RenderedReport, AssessmentServiceError> {
        let assessment = self.load_completed(requester, assessment_id)?;
        let data = self.report_data(&assessment);
        Ok(ReportFormatter::summary(&data))
    }

    /// Paid report. Every role needs a confirmed payment; unpaid requests get no payload.
    pub fn detailed_report(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<RenderedReport, AssessmentServiceError> {
        let assessment = self.load(requester, assessment_id)?;
        if !assessment.is_paid() {
            tracing::info!(assessment_id = %assessment_id, "detailed report requested before payment");
            return Err(self.payment_required(assessment.id));
        }
        if !assessment.is_completed() {
            return Err(ValidationError::NotCompleted(assessment.id).into());
        }

        let data = self.report_data(&assessment);
        Ok(ReportFormatter::detailed(&data))
    }

    pub fn confirm_payment(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
        confirmation: PaymentConfirmation,
    ) -> Result<PaymentReceipt, AssessmentServiceError> {
        let transaction_id = confirmation.transaction_id.trim().to_string();
        if transaction_id.is_empty() {
            return Err(ValidationError::MissingTransaction.into());
        }

        let _writes = self.write_lock();
        let mut assessment = self.load(requester, assessment_id)?;
        if let Some(receipt) = &assessment.payment {
            // Confirming twice returns the original receipt.
            return Ok(receipt.clone());
        }

        let receipt = PaymentReceipt {
            transaction_id,
            amount: self.payment.detailed_report_price,
            currency: self.payment.currency.clone(),
            paid_at: Utc::now(),
        };
        assessment.payment_status = PaymentStatus::Paid;
        assessment.payment = Some(receipt.clone());
        self.repository.update(assessment)?;

        tracing::info!(
            assessment_id = %assessment_id,
            amount = receipt.amount,
            currency = %receipt.currency,
            "detailed report payment confirmed"
        );
        Ok(receipt)
    }

    pub fn payment_status(
        &self,
        requester: &Requester,
        assessment_id: &AssessmentId,
    ) -> Result<PaymentStatusView, AssessmentServiceError> {
        let assessment = self.load(requester, assessment_id)?;
        Ok(PaymentStatusView {
            assessment_id: assessment.id,
            payment_status: assessment.payment_status,
            amount: self.payment.detailed_report_price,
            currency: self.payment.currency.clone(),
            receipt: assessment.payment,
        })
    }

    fn payment_required(&self, assessment_id: AssessmentId) -> AssessmentServiceError {
        AssessmentServiceError::PaymentRequired {
            assessment_id,
            amount: self.payment.detailed_report_price,
            currency: self.payment.currency.clone(),
        }
    }

    fn scoring(&self, assessment: &Assessment) -> AssessmentScoring {
        let bank = self.bank();
        AssessmentScoring::compute(&bank, self.free_text.as_ref(), assessment)
    }

    fn recommend(&self, assessment: &Assessment, scoring: &AssessmentScoring) -> RecommendationRecord {
        let primary = scoring.learning_style.as_ref().map(|result| result.primary);
        self.recommendations.recommend(primary, assessment.grade)
    }

    fn report_data(&self, assessment: &Assessment) -> ReportData {
        let scoring = self.scoring(assessment);
        let recommendation = self.recommend(assessment, &scoring);
        ReportData::new(assessment, &scoring, recommendation, Utc::now())
    }
}

/// Results payload for one completed assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResults {
    pub assessment_id: AssessmentId,
    pub student_id: StudentId,
    pub grade: Grade,
    pub grade_band: GradeBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub scoring: ScoringView,
    pub tips: Vec<&'static str>,
    pub ideal_environment: IdealEnvironment,
}

impl AssessmentResults {
    fn compute<S>(bank: &QuestionBank, free_text: &S, assessment: &Assessment) -> Self
    where
        S: FreeTextScorer + ?Sized,
    {
        let scoring = AssessmentScoring::compute(bank, free_text, assessment);
        Self {
            assessment_id: assessment.id.clone(),
            student_id: assessment.student_id.clone(),
            grade: assessment.grade,
            grade_band: assessment.grade_band(),
            completed_at: assessment.completed_at,
            scoring: scoring.to_view(),
            tips: scoring.tips(),
            ideal_environment: scoring.environment(),
        }
    }

    pub fn primary_style(&self) -> Option<crate::workflows::questions::Category> {
        self.scoring.learning_style.as_ref().map(|view| view.primary)
    }
}

/// A student's completed assessments with their results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentHistory {
    pub student_id: StudentId,
    pub assessments: Vec<AssessmentResults>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusView {
    pub assessment_id: AssessmentId,
    pub payment_status: PaymentStatus,
    pub amount: u32,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<PaymentReceipt>,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("detailed report for assessment {assessment_id} requires payment of {amount} {currency}")]
    PaymentRequired {
        assessment_id: AssessmentId,
        amount: u32,
        currency: String,
    },
    #[error("assessment {0} not found")]
    NotFound(AssessmentId),
    #[error("question {0} is already published")]
    QuestionConflict(QuestionId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
