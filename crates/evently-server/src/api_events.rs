//! HTTP handlers for the event API.
//!
//! Each handler composes the payload validator with the event store:
//! `ValidationError` maps to 400 with field-level detail, `NotFound` to 404,
//! and any store failure to an opaque 500. Store access runs on
//! `spawn_blocking` because pooled rusqlite connections are synchronous.

use crate::AppState;
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use evently_events::{
    create_event, delete_event, find_nearby, get_event, list_events, update_event,
    validate_create, validate_nearby, validate_update, CreateEventInput, Event, EventError,
    NearbyParams, UpdateEventInput, ValidationError,
};
use serde_json::json;
use std::sync::Arc;

/// 400 with the full list of violated fields, mirroring the validator.
fn validation_response(err: ValidationError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": err.violations })),
    )
        .into_response()
}

/// Maps an [`EventError`] to the correct HTTP response, logging non-404
/// errors. Store internals never reach the client.
fn event_err_response(op: &'static str, e: EventError) -> Response {
    match e {
        EventError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Event not found" })),
        )
            .into_response(),
        err => {
            tracing::error!(error = %err, op, "event store operation failed");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

fn pool_err_response(op: &'static str, e: r2d2::Error) -> Response {
    tracing::error!(error = %e, op, "failed to get db connection");
    internal_error()
}

fn join_err_response(op: &'static str, e: tokio::task::JoinError) -> Response {
    tracing::error!(error = %e, op, "blocking task join error");
    internal_error()
}

/// POST /events
pub async fn create_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateEventInput>,
) -> Result<(StatusCode, Json<Event>), Response> {
    let new_event = validate_create(&payload).map_err(validation_response)?;

    let pool = state.pool.clone();
    let event = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| pool_err_response("create", e))?;
        create_event(&conn, &new_event).map_err(|e| event_err_response("create", e))
    })
    .await
    .map_err(|e| join_err_response("create", e))??;

    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events
pub async fn list_events_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Event>>, Response> {
    let pool = state.pool.clone();
    let events = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| pool_err_response("list", e))?;
        list_events(&conn).map_err(|e| event_err_response("list", e))
    })
    .await
    .map_err(|e| join_err_response("list", e))??;

    Ok(Json(events))
}

/// GET /events/nearby?longitude=&latitude=&maxDistance=
pub async fn nearby_events_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<Event>>, Response> {
    let query = validate_nearby(&params).map_err(validation_response)?;

    let pool = state.pool.clone();
    let events = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| pool_err_response("nearby", e))?;
        find_nearby(&conn, &query).map_err(|e| event_err_response("nearby", e))
    })
    .await
    .map_err(|e| join_err_response("nearby", e))??;

    Ok(Json(events))
}

/// GET /events/{id}
pub async fn get_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Event>, Response> {
    let pool = state.pool.clone();
    let event = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| pool_err_response("get", e))?;
        get_event(&conn, &id).map_err(|e| event_err_response("get", e))
    })
    .await
    .map_err(|e| join_err_response("get", e))??;

    Ok(Json(event))
}

/// PUT /events/{id}
pub async fn update_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEventInput>,
) -> Result<Json<Event>, Response> {
    let patch = validate_update(&payload).map_err(validation_response)?;

    let pool = state.pool.clone();
    let event = tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| pool_err_response("update", e))?;
        update_event(&conn, &id, &patch).map_err(|e| event_err_response("update", e))
    })
    .await
    .map_err(|e| join_err_response("update", e))??;

    Ok(Json(event))
}

/// DELETE /events/{id}
pub async fn delete_event_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, Response> {
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| pool_err_response("delete", e))?;
        delete_event(&conn, &id).map_err(|e| event_err_response("delete", e))
    })
    .await
    .map_err(|e| join_err_response("delete", e))??;

    Ok(StatusCode::NO_CONTENT)
}
