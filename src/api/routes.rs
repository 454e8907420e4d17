//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, invalidate_handler, set_handler,
    stats_handler, update_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a value
/// - `GET /get/:key` - Retrieve a value by key
/// - `PUT /update` - Replace the value of an existing key
/// - `DELETE /del/:key` - Remove a key and its dependents
/// - `POST /invalidate` - Remove by plain key or pattern
/// - `POST /clear` - Remove everything
/// - `GET /stats` - Get cache diagnostics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/update", put(update_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/invalidate", post(invalidate_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
