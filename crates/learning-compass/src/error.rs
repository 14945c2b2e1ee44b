use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::assessment::router::error_response;
use crate::workflows::assessment::AssessmentServiceError;
use crate::workflows::questions::QuestionImportError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Process-level failures surfaced by the binaries.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("question import error: {0}")]
    QuestionImport(#[from] QuestionImportError),
    #[error("assessment error: {0}")]
    Assessment(#[from] AssessmentServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Assessment(error) => return error_response(error),
            AppError::QuestionImport(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::{AssessmentId, ValidationError};
    use std::error::Error as _;

    #[test]
    fn import_failures_map_to_bad_request() {
        let error = AppError::from(QuestionImportError::Row {
            line: 4,
            message: "unknown category 'musical'".to_string(),
        });
        assert!(error.to_string().contains("line 4"));
        assert!(error.source().is_some());
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn config_failures_map_to_internal_error() {
        let error = AppError::from(ConfigError::InvalidPort);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn assessment_failures_keep_their_status() {
        let error = AppError::from(AssessmentServiceError::from(ValidationError::MissingStudent));
        assert!(error.to_string().starts_with("assessment error:"));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);

        let error = AppError::from(AssessmentServiceError::NotFound(AssessmentId(
            "asm-missing".to_string(),
        )));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }
}
