//! Roster HTTP/JSON API.
//!
//! Student routes live under `/api/students/:id`, catalog and policy
//! administration under `/api/admin`. Handlers are thin: they extract the
//! request, call one [`RosterService`] method, and map the result through
//! [`ApiError`] or a decision response.

pub mod args;
pub mod error;
pub mod extract;
pub mod json;
pub mod routes;

pub use args::Args;
pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use roster_db::service::RosterService;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RosterService>,
    pub cors_permissive: bool,
}

impl AppState {
    pub fn new(service: RosterService, cors_permissive: bool) -> Self {
        Self {
            service: Arc::new(service),
            cors_permissive,
        }
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = if state.cors_permissive {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::policy::routes())
        .merge(routes::portal::routes())
        .merge(routes::departments::routes())
        .merge(routes::courses::routes())
        .merge(routes::prerequisites::routes())
        .merge(routes::students::routes())
        .merge(routes::ledger::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
