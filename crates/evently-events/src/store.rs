//! The geospatial event store.
//!
//! All functions operate on a borrowed [`rusqlite::Connection`]; callers own
//! the connection lifecycle (typically an `r2d2` pool checkout). Each
//! operation is a single statement, so SQLite's per-statement atomicity is
//! all the transactional machinery the store needs.
//!
//! Timestamps are stored as RFC 3339 UTC text with millisecond precision.
//! The fixed-width format makes lexicographic comparison equivalent to
//! chronological comparison, which the `date` index relies on.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use evently_types::{haversine_distance_m, GeoBounds, GeoPoint};
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Event, EventPatch, NearbyQuery, NewEvent};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum EventError {
    /// Underlying persistence failure, opaque to clients.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// No event with the given id.
    #[error("event not found: {0}")]
    NotFound(String),
}

const EVENT_COLUMNS: &str = "id, title, date, longitude, latitude, created_at, updated_at";

/// Creates a new event, assigning its id and timestamps.
pub fn create_event(conn: &Connection, new_event: &NewEvent) -> Result<Event, EventError> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().trunc_subsecs(3);
    let date = new_event.date.trunc_subsecs(3);

    conn.execute(
        "INSERT INTO events (id, title, date, longitude, latitude, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            new_event.title,
            format_ts(&date),
            new_event.location.longitude,
            new_event.location.latitude,
            format_ts(&now),
            format_ts(&now),
        ],
    )?;

    Ok(Event {
        id,
        title: new_event.title.clone(),
        date,
        location: new_event.location,
        created_at: now,
        updated_at: now,
    })
}

/// Retrieves an event by id.
pub fn get_event(conn: &Connection, id: &str) -> Result<Event, EventError> {
    conn.query_row(
        &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
        [id],
        map_row_to_event,
    )
    .optional()?
    .ok_or_else(|| EventError::NotFound(id.to_string()))
}

/// Lists all events, ordered by ascending date (ties broken by id).
pub fn list_events(conn: &Connection) -> Result<Vec<Event>, EventError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC, id ASC"))?;

    let rows = stmt.query_map([], map_row_to_event)?;
    let mut events = Vec::new();
    for row in rows {
        events.push(row?);
    }
    Ok(events)
}

/// Applies a partial update as a single atomic UPDATE statement.
///
/// Only fields that are `Some` in `patch` are modified. `updated_at` is
/// always refreshed, including for the empty patch — an empty update is a
/// valid no-op on user fields but still counts as a mutation.
pub fn update_event(conn: &Connection, id: &str, patch: &EventPatch) -> Result<Event, EventError> {
    let mut set_parts: Vec<String> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let mut idx = 1usize;

    if let Some(title) = &patch.title {
        set_parts.push(format!("title = ?{idx}"));
        values.push(Box::new(title.clone()));
        idx += 1;
    }
    if let Some(date) = &patch.date {
        set_parts.push(format!("date = ?{idx}"));
        values.push(Box::new(format_ts(&date.trunc_subsecs(3))));
        idx += 1;
    }
    if let Some(location) = &patch.location {
        set_parts.push(format!("longitude = ?{idx}"));
        values.push(Box::new(location.longitude));
        idx += 1;
        set_parts.push(format!("latitude = ?{idx}"));
        values.push(Box::new(location.latitude));
        idx += 1;
    }

    let now = Utc::now().trunc_subsecs(3);
    set_parts.push(format!("updated_at = ?{idx}"));
    values.push(Box::new(format_ts(&now)));
    idx += 1;

    let sql = format!(
        "UPDATE events SET {} WHERE id = ?{} RETURNING {EVENT_COLUMNS}",
        set_parts.join(", "),
        idx
    );
    values.push(Box::new(id.to_string()));

    let params: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();
    conn.query_row(&sql, params.as_slice(), map_row_to_event)
        .optional()?
        .ok_or_else(|| EventError::NotFound(id.to_string()))
}

/// Hard-deletes an event.
pub fn delete_event(conn: &Connection, id: &str) -> Result<(), EventError> {
    let count = conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(EventError::NotFound(id.to_string()));
    }
    Ok(())
}

/// Finds events within `query.max_distance_m` meters (great-circle) of
/// `query.center`, ordered by ascending distance, ties broken by id.
///
/// Candidates are selected with a spherical bounding box over the
/// `(latitude, longitude)` index, then filtered and ordered by exact
/// haversine distance. The box splits across the antimeridian and widens to
/// the full longitude range near the poles, so results are correct where a
/// planar box would miss neighbors.
pub fn find_nearby(conn: &Connection, query: &NearbyQuery) -> Result<Vec<Event>, EventError> {
    let bounds = GeoBounds::around(&query.center, query.max_distance_m);

    let mut values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
        Box::new(bounds.min_latitude),
        Box::new(bounds.max_latitude),
    ];
    let mut span_parts: Vec<String> = Vec::new();
    let mut idx = 3usize;
    for (lo, hi) in &bounds.longitude_spans {
        span_parts.push(format!("longitude BETWEEN ?{} AND ?{}", idx, idx + 1));
        values.push(Box::new(*lo));
        values.push(Box::new(*hi));
        idx += 2;
    }

    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events
         WHERE latitude BETWEEN ?1 AND ?2 AND ({})",
        span_parts.join(" OR ")
    );

    let params: Vec<&dyn rusqlite::types::ToSql> = values.iter().map(|v| v.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params.as_slice(), map_row_to_event)?;

    let mut hits: Vec<(f64, Event)> = Vec::new();
    let mut candidates = 0usize;
    for row in rows {
        let event = row?;
        candidates += 1;
        let distance = haversine_distance_m(&query.center, &event.location);
        if distance <= query.max_distance_m {
            hits.push((distance, event));
        }
    }

    tracing::debug!(
        candidates,
        matches = hits.len(),
        max_distance_m = query.max_distance_m,
        "nearby query resolved"
    );

    hits.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
    Ok(hits.into_iter().map(|(_, event)| event).collect())
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn map_row_to_event(row: &Row) -> rusqlite::Result<Event> {
    let date: String = row.get(2)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Event {
        id: row.get(0)?,
        title: row.get(1)?,
        date: parse_ts(&date, 2)?,
        location: GeoPoint::new(row.get(3)?, row.get(4)?),
        created_at: parse_ts(&created_at, 5)?,
        updated_at: parse_ts(&updated_at, 6)?,
    })
}

fn parse_ts(raw: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
