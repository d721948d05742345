//! `/api/admin/departments`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use roster_core::entities::Department;
use roster_core::ids::DepartmentId;
use roster_core::responses::DeleteOutcome;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::json::DepartmentName;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/departments", get(list).post(create))
        .route(
            "/api/admin/departments/:id",
            get(fetch).put(rename).delete(remove),
        )
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Department>>, ApiError> {
    Ok(Json(state.service.list_departments().await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<DepartmentName>,
) -> Result<(StatusCode, Json<Department>), ApiError> {
    let department = state.service.create_department(&body.name).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

async fn fetch(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DepartmentId>,
) -> Result<Json<Department>, ApiError> {
    Ok(Json(state.service.get_department(id).await?))
}

async fn rename(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DepartmentId>,
    ApiJson(body): ApiJson<DepartmentName>,
) -> Result<Json<Department>, ApiError> {
    Ok(Json(state.service.rename_department(id, &body.name).await?))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DepartmentId>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    Ok(Json(state.service.delete_department(id).await?))
}
