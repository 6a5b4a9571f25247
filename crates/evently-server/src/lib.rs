//! Evently server library logic.
//!
//! Builds the axum router for the event API: CRUD plus geospatial nearby
//! queries, with a health probe for load balancers and CI.

pub mod api_events;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Extension, Json, Router,
};
use evently_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (64 KiB). An event payload is a title, a date,
/// and a coordinate pair; anything larger is malformed.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
///
/// Returns `200 OK` with server status and version. Used by load balancers,
/// monitoring, and CI to verify the server is running.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/events",
            axum::routing::post(api_events::create_event_handler)
                .get(api_events::list_events_handler),
        )
        .route("/events/nearby", get(api_events::nearby_events_handler))
        .route(
            "/events/{id}",
            get(api_events::get_event_handler)
                .put(api_events::update_event_handler)
                .delete(api_events::delete_event_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
