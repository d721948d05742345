//! Student-facing routes: `/api/students/:id/...`.

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use roster_core::ids::StudentId;
use roster_core::responses::{
    AvailableCourses, CompletedCourseView, EnrollmentCount, StudentInfo,
};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::json::{CourseSelection, decision_response};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/students/:id/info", get(info))
        .route("/api/students/:id/available-courses", get(available_courses))
        .route("/api/students/:id/completed-courses", get(completed_courses))
        .route("/api/students/:id/enrollment-count", get(enrollment_count))
        .route("/api/students/:id/enroll", post(enroll))
        .route("/api/students/:id/unenroll", post(unenroll))
}

async fn info(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<Json<StudentInfo>, ApiError> {
    Ok(Json(state.service.student_info(id).await?))
}

async fn available_courses(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<Json<AvailableCourses>, ApiError> {
    Ok(Json(state.service.available_courses(id).await?))
}

async fn completed_courses(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<Json<Vec<CompletedCourseView>>, ApiError> {
    Ok(Json(state.service.completed_courses(id).await?))
}

async fn enrollment_count(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<Json<EnrollmentCount>, ApiError> {
    Ok(Json(state.service.enrollment_count(id).await?))
}

async fn enroll(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
    ApiJson(body): ApiJson<CourseSelection>,
) -> Result<Response, ApiError> {
    let outcome = state.service.enroll(id, body.course_id).await?;
    Ok(decision_response(outcome.reason, outcome))
}

async fn unenroll(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
    ApiJson(body): ApiJson<CourseSelection>,
) -> Result<Response, ApiError> {
    let outcome = state.service.unenroll(id, body.course_id).await?;
    Ok(decision_response(outcome.reason, outcome))
}
