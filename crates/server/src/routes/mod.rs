//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the store)
//!
//! # Sweets
//! GET    /api/sweets                - List all (public)
//! GET    /api/sweets/search         - Filtered search (public)
//! GET    /api/sweets/{id}           - Single sweet (public)
//! POST   /api/sweets                - Create (admin)
//! PUT    /api/sweets/{id}           - Update (admin)
//! DELETE /api/sweets/{id}           - Delete (admin)
//! POST   /api/sweets/{id}/purchase  - Purchase (authenticated)
//! POST   /api/sweets/{id}/restock   - Restock (admin)
//! ```

pub mod sweets;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Router, extract::State};

use crate::state::AppState;

/// Build the application router (state is applied by the caller).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route(
            "/api/sweets",
            get(sweets::list).post(sweets::create),
        )
        .route("/api/sweets/search", get(sweets::search))
        .route(
            "/api/sweets/{id}",
            get(sweets::get_one)
                .put(sweets::update)
                .delete(sweets::delete_one),
        )
        .route("/api/sweets/{id}/purchase", axum::routing::post(sweets::purchase))
        .route("/api/sweets/{id}/restock", axum::routing::post(sweets::restock))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK.
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
