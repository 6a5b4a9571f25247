//! The `GeoPoint` coordinate pair and its GeoJSON wire representation.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Valid longitude range in degrees.
pub const LONGITUDE_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// Valid latitude range in degrees.
pub const LATITUDE_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// A point on the Earth's surface.
///
/// Serialized as a GeoJSON Point — `{"type": "Point", "coordinates":
/// [longitude, latitude]}`. The coordinate order is longitude first, matching
/// GeoJSON; it is never swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Degrees east, in [-180, 180].
    pub longitude: f64,
    /// Degrees north, in [-90, 90].
    pub latitude: f64,
}

impl GeoPoint {
    /// Creates a point without range checking. Range validation belongs to
    /// the payload validator (which checks each axis against
    /// [`LONGITUDE_RANGE`] and [`LATITUDE_RANGE`] so it can name the
    /// violated field); persisted points are always in range.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// GeoJSON wire form used by both `Serialize` and `Deserialize`.
#[derive(Serialize, Deserialize)]
struct GeoJsonPoint {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

impl Serialize for GeoPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GeoJsonPoint {
            kind: "Point".to_string(),
            coordinates: [self.longitude, self.latitude],
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = GeoJsonPoint::deserialize(deserializer)?;
        if raw.kind != "Point" {
            return Err(D::Error::custom(format!(
                "unsupported geometry type: {}",
                raw.kind
            )));
        }
        Ok(GeoPoint {
            longitude: raw.coordinates[0],
            latitude: raw.coordinates[1],
        })
    }
}
