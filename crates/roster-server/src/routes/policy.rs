//! Registration status and max-courses limit, public reads and admin writes.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use roster_core::entities::Policy;
use roster_core::responses::{MaxCoursesLimit, RegistrationStatus};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::json::{SetMaxCoursesLimit, SetRegistrationStatus};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/registration-status", get(registration_status))
        .route("/api/max-courses-limit", get(max_courses_limit))
        .route("/api/admin/registration-status", post(set_registration_status))
        .route("/api/admin/max-courses-limit", post(set_max_courses_limit))
}

async fn registration_status(
    State(state): State<AppState>,
) -> Result<Json<RegistrationStatus>, ApiError> {
    let policy = state.service.get_policy().await?;
    Ok(Json(RegistrationStatus {
        registration_open: policy.registration_open,
    }))
}

/// Clients poll this while an admin may be changing it; never cache.
async fn max_courses_limit(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let policy = state.service.get_policy().await?;
    Ok((
        [
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Json(MaxCoursesLimit {
            max_courses_limit: policy.max_courses_limit,
        }),
    ))
}

async fn set_registration_status(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetRegistrationStatus>,
) -> Result<Json<Policy>, ApiError> {
    Ok(Json(state.service.set_registration_open(body.is_open).await?))
}

async fn set_max_courses_limit(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SetMaxCoursesLimit>,
) -> Result<Json<Policy>, ApiError> {
    Ok(Json(
        state
            .service
            .set_max_courses_limit(body.max_courses_limit)
            .await?,
    ))
}
