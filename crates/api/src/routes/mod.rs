//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /              - API name and version
//! GET    /health        - Liveness check
//! GET    /health/ready  - Readiness check (database reachable)
//!
//! # Games
//! POST   /games         - Create a game
//! GET    /games         - Paginated listing (?page=&page_size=)
//! GET    /games/{id}    - Game detail
//! PUT    /games/{id}    - Replace a game
//! DELETE /games/{id}    - Delete a game
//! ```

pub mod games;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router, including tracing and Sentry layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(games::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// API name and version.
async fn root() -> Json<Value> {
    Json(json!({
        "message": "Retro Games API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
