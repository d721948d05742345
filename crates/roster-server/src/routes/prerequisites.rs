//! `/api/admin/prerequisites`.

use axum::extract::State;
use axum::response::Response;
use axum::routing::{delete, post};
use axum::{Json, Router};
use roster_core::ids::PrerequisiteId;
use roster_core::responses::DeleteOutcome;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::json::{NewPrerequisite, decision_response};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/prerequisites", post(add))
        .route("/api/admin/prerequisites/:id", delete(remove))
}

/// A rejected edge is a 400 decision body, not an error body.
async fn add(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewPrerequisite>,
) -> Result<Response, ApiError> {
    let outcome = state
        .service
        .add_prerequisite(body.course_id, body.prerequisite_id)
        .await?;
    Ok(decision_response(outcome.reason, outcome))
}

async fn remove(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<PrerequisiteId>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    Ok(Json(state.service.remove_prerequisite(id).await?))
}
