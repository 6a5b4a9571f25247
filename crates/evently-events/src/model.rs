//! Domain model for events.

use chrono::{DateTime, Utc};
use evently_types::GeoPoint;
use serde::{Deserialize, Serialize};

/// A persisted event.
///
/// Wire form is camelCase with the location as a GeoJSON Point, matching the
/// mobile client's expectations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// UUID assigned by the store on creation.
    pub id: String,
    /// Display title, 1–200 characters.
    pub title: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Where the event takes place.
    pub location: GeoPoint,
    /// Set once on creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation; never earlier than `created_at`.
    pub updated_at: DateTime<Utc>,
}

/// A validated payload for creating an event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: GeoPoint,
}

/// A validated partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<GeoPoint>,
}

impl EventPatch {
    /// Returns `true` if the patch supplies no fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.date.is_none() && self.location.is_none()
    }
}

/// A validated proximity query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    /// Reference point for the search.
    pub center: GeoPoint,
    /// Inclusive distance threshold in meters.
    pub max_distance_m: f64,
}
