//! JSON request and response types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roster_core::enums::DenyReason;
use roster_core::ids::{CourseId, DepartmentId, StudentId};
use serde::{Deserialize, Serialize};

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `true`.
    pub error: bool,
    pub code: String,
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: String,
    pub version: String,
    pub database_connected: bool,
}

/// Body of `POST /api/students/:id/enroll` and `/unenroll`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CourseSelection {
    pub course_id: CourseId,
}

/// Body of department create and rename.
#[derive(Debug, Serialize, Deserialize)]
pub struct DepartmentName {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewPrerequisite {
    pub course_id: CourseId,
    pub prerequisite_id: CourseId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewCompletion {
    pub student_id: StudentId,
    pub course_id: CourseId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetRegistrationStatus {
    pub is_open: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetMaxCoursesLimit {
    pub max_courses_limit: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetStudent {
    pub registration_number: String,
}

/// `?department_id=` filter on list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DepartmentFilter {
    pub department_id: Option<DepartmentId>,
}

/// `?force=true` on student deletion.
#[derive(Debug, Default, Deserialize)]
pub struct ForceFlag {
    #[serde(default)]
    pub force: bool,
}

/// HTTP status for an enroll/unenroll/prerequisite decision.
pub const fn decision_status(reason: Option<DenyReason>) -> StatusCode {
    match reason {
        None => StatusCode::OK,
        Some(DenyReason::RegistrationClosed) => StatusCode::FORBIDDEN,
        Some(_) => StatusCode::BAD_REQUEST,
    }
}

/// Render a decision outcome with the status its reason calls for.
pub fn decision_response<T: Serialize>(reason: Option<DenyReason>, body: T) -> Response {
    (decision_status(reason), Json(body)).into_response()
}
