//! Shared geographic types for the Evently platform.
//!
//! This crate provides the foundational geo types used across all Evently
//! crates: the [`GeoPoint`] coordinate pair (serialized in GeoJSON Point
//! form), coordinate range constants, and spherical geometry helpers
//! (haversine distance, bounding boxes for proximity scans).
//!
//! No crate in the workspace depends on anything *except* `evently-types`
//! for cross-cutting type definitions. This keeps the dependency graph clean
//! and prevents circular dependencies.

mod geo;
mod point;

pub use geo::{haversine_distance_m, GeoBounds, EARTH_RADIUS_M};
pub use point::{GeoPoint, LATITUDE_RANGE, LONGITUDE_RANGE};
