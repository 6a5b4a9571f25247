//! Event model, payload validation, and the geospatial event store.
//!
//! Implements the testable core of the Evently backend: typed validation of
//! create/update/nearby payloads (collecting every violated field), and CRUD
//! plus proximity queries over the SQLite `events` table.
//!
//! The nearby query is spherical: candidates are selected with a bounding
//! box computed on the sphere (antimeridian- and pole-aware), then filtered
//! and ordered by exact haversine distance. See [`store::find_nearby`].

mod model;
pub mod store;
pub mod validate;

pub use model::{Event, EventPatch, NearbyQuery, NewEvent};
pub use store::{
    create_event, delete_event, find_nearby, get_event, list_events, update_event, EventError,
};
pub use validate::{
    validate_create, validate_nearby, validate_update, CreateEventInput, FieldViolation,
    LocationInput, NearbyParams, UpdateEventInput, ValidationError, DEFAULT_MAX_DISTANCE_M,
};
