use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{Assessment, StudentId};

pub const ROLE_HEADER: &str = "x-requester-role";
pub const STUDENT_HEADER: &str = "x-student-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Teacher,
    Parent,
    Student,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
            Self::Student => "student",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "teacher" => Some(Self::Teacher),
            "parent" => Some(Self::Parent),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    /// Roles that see every assessment rather than one student's.
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Teacher)
    }
}

/// Who is calling, resolved once per request and passed explicitly to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub role: Role,
    pub student_id: Option<StudentId>,
}

impl Requester {
    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            student_id: None,
        }
    }

    pub fn student(id: impl Into<String>) -> Self {
        Self {
            role: Role::Student,
            student_id: Some(StudentId(id.into())),
        }
    }

    pub fn parent_of(id: impl Into<String>) -> Self {
        Self {
            role: Role::Parent,
            student_id: Some(StudentId(id.into())),
        }
    }

    pub fn can_access(&self, assessment: &Assessment) -> bool {
        self.can_view_student(&assessment.student_id)
    }

    /// Staff see every student; parents and students only the linked one.
    pub fn can_view_student(&self, student_id: &StudentId) -> bool {
        self.role.is_staff() || self.student_id.as_ref() == Some(student_id)
    }

    pub fn can_publish_questions(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequesterRejection {
    #[error("missing {} header", ROLE_HEADER)]
    MissingRole,
    #[error("unknown requester role '{0}'")]
    UnknownRole(String),
    #[error("{} requests must carry {}", .0.as_str(), STUDENT_HEADER)]
    MissingStudent(Role),
}

impl IntoResponse for RequesterRejection {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": self.to_string(),
        });
        (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
    }
}

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl Requester {
    pub fn from_parts(parts: &Parts) -> Result<Self, RequesterRejection> {
        let raw_role = header_value(parts, ROLE_HEADER).ok_or(RequesterRejection::MissingRole)?;
        let role =
            Role::parse(raw_role).ok_or_else(|| RequesterRejection::UnknownRole(raw_role.to_string()))?;
        let student_id = header_value(parts, STUDENT_HEADER).map(|id| StudentId(id.to_string()));

        if !role.is_staff() && student_id.is_none() {
            return Err(RequesterRejection::MissingStudent(role));
        }

        Ok(Self { role, student_id })
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = RequesterRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}
