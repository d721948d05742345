//! `/api/admin/students`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use roster_core::entities::Student;
use roster_core::ids::StudentId;
use roster_core::responses::{DeleteOutcome, StudentCourses};
use roster_db::repos::student::NewStudent;
use roster_db::updates::student::StudentUpdate;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::json::{DepartmentFilter, ForceFlag};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/students", get(list).post(create))
        .route(
            "/api/admin/students/:id",
            get(fetch).put(update).delete(remove),
        )
        .route("/api/admin/students/:id/courses", get(courses))
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<DepartmentFilter>,
) -> Result<Json<Vec<Student>>, ApiError> {
    Ok(Json(state.service.list_students(filter.department_id).await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewStudent>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let student = state.service.create_student(&body).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

async fn fetch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<Json<Student>, ApiError> {
    Ok(Json(state.service.get_student(id).await?))
}

async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
    ApiJson(body): ApiJson<StudentUpdate>,
) -> Result<Json<Student>, ApiError> {
    Ok(Json(state.service.update_student(id, &body).await?))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
    ApiQuery(flag): ApiQuery<ForceFlag>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    Ok(Json(state.service.delete_student(id, flag.force).await?))
}

async fn courses(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<StudentId>,
) -> Result<Json<StudentCourses>, ApiError> {
    Ok(Json(state.service.student_courses(id).await?))
}
