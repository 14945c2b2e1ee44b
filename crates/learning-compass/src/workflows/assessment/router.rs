use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::access::Requester;
use super::collector::ValidationError;
use super::domain::{
    AssessmentId, NewAssessment, PaymentConfirmation, ResponseBatch, ResponseSubmission,
    StudentId,
};
use super::repository::{AssessmentRepository, RepositoryError};
use super::scoring::FreeTextScorer;
use super::service::{AssessmentService, AssessmentServiceError};
use crate::workflows::questions::{Grade, Question};
use crate::workflows::report::RenderedReport;

type SharedService<R, S> = Arc<AssessmentService<R, S>>;

/// Router builder exposing the assessment, report, and payment endpoints under `/api/v1`.
pub fn assessment_router<R, S>(service: SharedService<R, S>) -> Router
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    Router::new()
        .route(
            "/api/v1/questions/",
            get(list_questions_handler::<R, S>).post(publish_question_handler::<R, S>),
        )
        .route("/api/v1/assessments/", post(create_handler::<R, S>))
        .route("/api/v1/assessments/:assessment_id/", get(status_handler::<R, S>))
        .route(
            "/api/v1/assessments/:assessment_id/questions/",
            get(assessment_questions_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/complete/",
            post(complete_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/results/",
            get(results_handler::<R, S>),
        )
        .route(
            "/api/v1/students/:student_id/assessments/",
            get(student_history_handler::<R, S>),
        )
        .route("/api/v1/responses/", post(response_handler::<R, S>))
        .route("/api/v1/responses/batch/", post(batch_handler::<R, S>))
        .route(
            "/api/v1/recommendations/:assessment_id/",
            get(recommendations_handler::<R, S>),
        )
        .route(
            "/api/v1/reports/:assessment_id/summary/",
            get(summary_report_handler::<R, S>),
        )
        .route(
            "/api/v1/reports/:assessment_id/detailed/",
            get(detailed_report_handler::<R, S>),
        )
        .route(
            "/api/v1/payments/:assessment_id/",
            get(payment_status_handler::<R, S>),
        )
        .route(
            "/api/v1/payments/:assessment_id/confirm/",
            post(confirm_payment_handler::<R, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionQuery {
    grade: Option<String>,
}

pub(crate) async fn list_questions_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    _requester: Requester,
    Query(query): Query<QuestionQuery>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    let grade = match query.grade.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => match Grade::parse(raw) {
            Some(grade) => Some(grade),
            None => {
                let payload = json!({
                    "error": format!("unknown grade '{raw}'"),
                    "field": "grade",
                });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
        None => None,
    };

    (StatusCode::OK, axum::Json(service.questions(grade))).into_response()
}

pub(crate) async fn publish_question_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    payload: Result<axum::Json<Question>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    let axum::Json(question) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection(rejection),
    };

    match service.publish_question(&requester, question) {
        Ok(question) => (StatusCode::CREATED, axum::Json(question)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    payload: Result<axum::Json<NewAssessment>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection(rejection),
    };

    match service.create_assessment(&requester, request) {
        Ok(assessment) => {
            (StatusCode::CREATED, axum::Json(assessment.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.status(&requester, &AssessmentId(assessment_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assessment_questions_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.assessment_questions(&requester, &AssessmentId(assessment_id)) {
        Ok(questions) => (StatusCode::OK, axum::Json(questions)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn response_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    payload: Result<axum::Json<ResponseSubmission>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    let axum::Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection(rejection),
    };

    match service.record_response(&requester, submission) {
        Ok(response) => (StatusCode::CREATED, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn batch_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    payload: Result<axum::Json<ResponseBatch>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    let axum::Json(batch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection(rejection),
    };

    match service.record_batch(&requester, batch) {
        Ok(responses) => {
            let payload = json!({
                "recorded": responses.len(),
                "responses": responses,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.complete(&requester, &AssessmentId(assessment_id)) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn results_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.results(&requester, &AssessmentId(assessment_id)) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn student_history_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(student_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.student_history(&requester, &StudentId(student_id)) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recommendations_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.recommendations(&requester, &AssessmentId(assessment_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn summary_report_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.summary_report(&requester, &AssessmentId(assessment_id)) {
        Ok(report) => report_response(report),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detailed_report_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.detailed_report(&requester, &AssessmentId(assessment_id)) {
        Ok(report) => report_response(report),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn payment_status_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    match service.payment_status(&requester, &AssessmentId(assessment_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn confirm_payment_handler<R, S>(
    State(service): State<SharedService<R, S>>,
    requester: Requester,
    Path(assessment_id): Path<String>,
    payload: Result<axum::Json<PaymentConfirmation>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: FreeTextScorer + 'static,
{
    let axum::Json(confirmation) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return body_rejection(rejection),
    };

    match service.confirm_payment(&requester, &AssessmentId(assessment_id), confirmation) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

fn report_response(report: RenderedReport) -> Response {
    let disposition = format!("inline; filename=\"{}\"", report.file_name);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.body,
    )
        .into_response()
}

fn body_rejection(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
        "field": "body",
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn validation_payload(error: &ValidationError) -> serde_json::Value {
    let mut payload = json!({
        "error": error.to_string(),
        "field": error.field(),
    });
    let question_ids = error.question_ids();
    if !question_ids.is_empty() {
        payload["question_ids"] = json!(question_ids);
    }
    payload
}

pub(crate) fn error_response(error: AssessmentServiceError) -> Response {
    match error {
        AssessmentServiceError::Validation(error) => {
            (StatusCode::BAD_REQUEST, axum::Json(validation_payload(&error))).into_response()
        }
        AssessmentServiceError::Forbidden(reason) => {
            let payload = json!({
                "error": reason,
            });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        AssessmentServiceError::PaymentRequired {
            assessment_id,
            amount,
            currency,
        } => {
            let payload = json!({
                "error": "payment required for the detailed report",
                "assessment_id": assessment_id,
                "amount": amount,
                "currency": currency,
            });
            (StatusCode::PAYMENT_REQUIRED, axum::Json(payload)).into_response()
        }
        AssessmentServiceError::NotFound(assessment_id) => {
            let payload = json!({
                "error": "assessment not found",
                "assessment_id": assessment_id,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        AssessmentServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "error": "record not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        error @ (AssessmentServiceError::QuestionConflict(_)
        | AssessmentServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        AssessmentServiceError::Repository(error @ RepositoryError::Unavailable(_)) => {
            tracing::error!(%error, "assessment storage failed");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
