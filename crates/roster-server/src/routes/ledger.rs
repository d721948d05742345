//! Completions, enrollment resets, and course statistics.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use roster_core::entities::CompletedCourse;
use roster_core::responses::{CourseStatistics, ResetOutcome};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::json::{NewCompletion, ResetStudent};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/completed-courses", post(record_completion))
        .route("/api/admin/reset-enrollments", post(reset_all))
        .route("/api/admin/reset-student-enrollments", post(reset_student))
        .route("/api/admin/course-statistics", get(statistics))
}

async fn record_completion(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCompletion>,
) -> Result<(StatusCode, Json<CompletedCourse>), ApiError> {
    let completed = state
        .service
        .record_completion(body.student_id, body.course_id)
        .await?;
    Ok((StatusCode::CREATED, Json(completed)))
}

async fn reset_all(State(state): State<AppState>) -> Result<Json<ResetOutcome>, ApiError> {
    Ok(Json(state.service.reset_enrollments().await?))
}

async fn reset_student(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ResetStudent>,
) -> Result<Json<ResetOutcome>, ApiError> {
    Ok(Json(
        state
            .service
            .reset_student_enrollments(&body.registration_number)
            .await?,
    ))
}

async fn statistics(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseStatistics>>, ApiError> {
    Ok(Json(state.service.course_statistics().await?))
}
