//! Liveness and readiness endpoints. Unauthenticated.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::application::ConversationStore;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /health - the process is up
async fn liveness() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// GET /health/ready - the storage backend answers
async fn readiness(State(store): State<ConversationStore>) -> impl IntoResponse {
    match store.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                }),
            )
        }
    }
}

pub fn health_routes(store: ConversationStore) -> Router {
    Router::new()
        .route("/health", get(liveness))
        .route("/health/ready", get(readiness))
        .with_state(store)
}
