//! `/api/admin/courses`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use roster_core::entities::Course;
use roster_core::ids::CourseId;
use roster_core::responses::{CoursePrerequisites, CourseRoster, DeleteOutcome};
use roster_db::repos::course::NewCourse;
use roster_db::updates::course::CourseUpdate;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::json::DepartmentFilter;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/courses", get(list).post(create))
        .route(
            "/api/admin/courses/:id",
            get(fetch).put(update).delete(remove),
        )
        .route("/api/admin/courses/:id/prerequisites", get(prerequisites))
        .route("/api/admin/courses/:id/students", get(roster))
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DepartmentFilter>,
) -> Result<Json<Vec<Course>>, ApiError> {
    Ok(Json(state.service.list_courses(filter.department_id).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewCourse>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let course = state.service.create_course(&body).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn fetch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
) -> Result<Json<Course>, ApiError> {
    Ok(Json(state.service.get_course(id).await?))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
    ApiJson(body): ApiJson<CourseUpdate>,
) -> Result<Json<Course>, ApiError> {
    Ok(Json(state.service.update_course(id, &body).await?))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    Ok(Json(state.service.delete_course(id).await?))
}

async fn prerequisites(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
) -> Result<Json<CoursePrerequisites>, ApiError> {
    Ok(Json(state.service.course_prerequisite_details(id).await?))
}

async fn roster(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<CourseId>,
) -> Result<Json<CourseRoster>, ApiError> {
    Ok(Json(state.service.course_roster(id).await?))
}
