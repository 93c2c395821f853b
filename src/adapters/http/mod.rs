//! HTTP adapter - REST API over the conversation store.
//!
//! ```text
//! /health                      liveness
//! /health/ready                backend ping
//! /api/conversations/...       Bearer-authenticated conversation routes
//! ```

pub mod conversation;
pub mod error;
pub mod health;
pub mod middleware;

pub use conversation::conversation_routes;
pub use error::ErrorResponse;
pub use health::health_routes;
pub use middleware::{auth_middleware, AuthState, RequireAuth};

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::ConversationStore;
use crate::config::ServerConfig;

/// Builds the full application router with its middleware stack.
pub fn app_router(store: ConversationStore, validator: AuthState, server: &ServerConfig) -> Router {
    let api = Router::new()
        .nest("/api/conversations", conversation_routes(store.clone()))
        .layer(axum::middleware::from_fn_with_state(validator, auth_middleware));

    Router::new()
        .merge(health_routes(store))
        .merge(api)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured; otherwise only the listed ones.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}
