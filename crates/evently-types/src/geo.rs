//! Spherical geometry: great-circle distance and proximity bounding boxes.
//!
//! Distances use the haversine formula on a sphere of mean Earth radius.
//! Bounding boxes are computed on the sphere, not on a flat projection: the
//! longitude span widens with latitude, splits in two when it crosses the
//! antimeridian, and degenerates to the full longitude range when the search
//! cap contains a pole. A planar box gets all three of those wrong.

use crate::GeoPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points, in meters.
///
/// Uses the haversine formula, which is numerically stable for the short
/// distances a proximity query cares about.
pub fn haversine_distance_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// A latitude band plus one or two longitude intervals bounding a spherical
/// cap. Two intervals occur when the cap crosses the antimeridian.
///
/// The box over-approximates the cap; callers must apply an exact
/// [`haversine_distance_m`] filter to candidates inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoBounds {
    /// Southern edge, degrees, clamped to -90.
    pub min_latitude: f64,
    /// Northern edge, degrees, clamped to 90.
    pub max_latitude: f64,
    /// Inclusive longitude intervals in degrees, each within [-180, 180].
    pub longitude_spans: Vec<(f64, f64)>,
}

impl GeoBounds {
    /// Bounding box for the spherical cap of radius `radius_m` meters around
    /// `center`.
    pub fn around(center: &GeoPoint, radius_m: f64) -> Self {
        let angular_radius = radius_m / EARTH_RADIUS_M;

        // A cap with angular radius >= 90 degrees is not representable as a
        // lat/lon box; scan the whole sphere and let the exact filter decide.
        if angular_radius >= std::f64::consts::FRAC_PI_2 {
            return Self::full_sphere();
        }

        let lat_rad = center.latitude.to_radians();
        let min_lat_rad = lat_rad - angular_radius;
        let max_lat_rad = lat_rad + angular_radius;

        // Cap contains a pole: every longitude passes through it.
        if min_lat_rad <= -std::f64::consts::FRAC_PI_2 {
            return Self {
                min_latitude: -90.0,
                max_latitude: max_lat_rad.to_degrees().min(90.0),
                longitude_spans: vec![(-180.0, 180.0)],
            };
        }
        if max_lat_rad >= std::f64::consts::FRAC_PI_2 {
            return Self {
                min_latitude: min_lat_rad.to_degrees().max(-90.0),
                max_latitude: 90.0,
                longitude_spans: vec![(-180.0, 180.0)],
            };
        }

        // Widest longitude extent of the cap. The extreme is not at the
        // center latitude, which is why the naive radius/cos(lat) formula
        // under-covers; asin(sin(r)/cos(lat)) is exact.
        let sin_ratio = angular_radius.sin() / lat_rad.cos();
        if sin_ratio >= 1.0 {
            return Self {
                min_latitude: min_lat_rad.to_degrees(),
                max_latitude: max_lat_rad.to_degrees(),
                longitude_spans: vec![(-180.0, 180.0)],
            };
        }
        let delta_lon_deg = sin_ratio.asin().to_degrees();

        let min_lon = center.longitude - delta_lon_deg;
        let max_lon = center.longitude + delta_lon_deg;

        let longitude_spans = if min_lon < -180.0 {
            vec![(min_lon + 360.0, 180.0), (-180.0, max_lon)]
        } else if max_lon > 180.0 {
            vec![(min_lon, 180.0), (-180.0, max_lon - 360.0)]
        } else {
            vec![(min_lon, max_lon)]
        };

        Self {
            min_latitude: min_lat_rad.to_degrees(),
            max_latitude: max_lat_rad.to_degrees(),
            longitude_spans,
        }
    }

    fn full_sphere() -> Self {
        Self {
            min_latitude: -90.0,
            max_latitude: 90.0,
            longitude_spans: vec![(-180.0, 180.0)],
        }
    }

    /// Returns `true` if `point` lies inside the box.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_latitude
            && point.latitude <= self.max_latitude
            && self
                .longitude_spans
                .iter()
                .any(|(lo, hi)| point.longitude >= *lo && point.longitude <= *hi)
    }
}
