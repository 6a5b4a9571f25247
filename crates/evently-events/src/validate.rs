//! Typed payload validation.
//!
//! Each validator takes a loosely-typed request payload and either returns a
//! normalized structure or a [`ValidationError`] listing **every** violated
//! field, so a client can fix a whole payload in one round trip rather than
//! field by field.

use chrono::{DateTime, Utc};
use evently_types::{GeoPoint, LATITUDE_RANGE, LONGITUDE_RANGE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{EventPatch, NearbyQuery, NewEvent};

/// Default nearby-search radius in meters when `maxDistance` is omitted.
pub const DEFAULT_MAX_DISTANCE_M: f64 = 10_000.0;

/// Maximum title length in characters.
const MAX_TITLE_CHARS: usize = 200;

/// A single violated field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `location.coordinates`.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A rejected payload, carrying every violated field.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("validation failed: {}", joined_fields(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn joined_fields(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw location payload before validation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LocationInput {
    /// GeoJSON geometry type; must be `"Point"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]` — arity checked by the validator so a wrong
    /// element count is reported as a field violation, not a parse error.
    pub coordinates: Vec<f64>,
}

/// Raw create payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventInput {
    pub title: Option<String>,
    pub date: Option<String>,
    pub location: Option<LocationInput>,
}

/// Raw partial-update payload. All fields optional; the empty payload is a
/// valid no-op update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventInput {
    pub title: Option<String>,
    pub date: Option<String>,
    pub location: Option<LocationInput>,
}

/// Raw nearby query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyParams {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    #[serde(rename = "maxDistance")]
    pub max_distance: Option<f64>,
}

/// Validates a create payload.
///
/// Requires `title` (1–200 characters after trimming), `date` (RFC 3339),
/// and a GeoJSON Point location with in-range coordinates.
pub fn validate_create(input: &CreateEventInput) -> Result<NewEvent, ValidationError> {
    let mut violations = Vec::new();

    let title = match &input.title {
        Some(raw) => check_title(raw, &mut violations),
        None => {
            violations.push(FieldViolation::new("title", "Title is required"));
            None
        }
    };

    let date = match &input.date {
        Some(raw) => check_date(raw, &mut violations),
        None => {
            violations.push(FieldViolation::new("date", "Event date is required"));
            None
        }
    };

    let location = match &input.location {
        Some(raw) => check_location(raw, &mut violations),
        None => {
            violations.push(FieldViolation::new("location", "Location is required"));
            None
        }
    };

    match (title, date, location) {
        (Some(title), Some(date), Some(location)) if violations.is_empty() => Ok(NewEvent {
            title,
            date,
            location,
        }),
        _ => Err(ValidationError { violations }),
    }
}

/// Validates a partial-update payload. Per-field rules match
/// [`validate_create`]; every field is optional and the empty payload
/// produces an empty [`EventPatch`].
pub fn validate_update(input: &UpdateEventInput) -> Result<EventPatch, ValidationError> {
    let mut violations = Vec::new();

    let title = input
        .title
        .as_ref()
        .and_then(|raw| check_title(raw, &mut violations));
    let date = input
        .date
        .as_ref()
        .and_then(|raw| check_date(raw, &mut violations));
    let location = input
        .location
        .as_ref()
        .and_then(|raw| check_location(raw, &mut violations));

    if violations.is_empty() {
        Ok(EventPatch {
            title,
            date,
            location,
        })
    } else {
        Err(ValidationError { violations })
    }
}

/// Validates nearby query parameters.
///
/// `longitude` and `latitude` are required and must be in range;
/// `maxDistance` defaults to [`DEFAULT_MAX_DISTANCE_M`] and must be a
/// positive finite number when given.
pub fn validate_nearby(params: &NearbyParams) -> Result<NearbyQuery, ValidationError> {
    let mut violations = Vec::new();

    let longitude = check_coordinate(
        params.longitude,
        "longitude",
        &LONGITUDE_RANGE,
        &mut violations,
    );
    let latitude = check_coordinate(
        params.latitude,
        "latitude",
        &LATITUDE_RANGE,
        &mut violations,
    );

    let max_distance_m = match params.max_distance {
        None => Some(DEFAULT_MAX_DISTANCE_M),
        Some(d) if d.is_finite() && d > 0.0 => Some(d),
        Some(_) => {
            violations.push(FieldViolation::new(
                "maxDistance",
                "maxDistance must be a positive number of meters",
            ));
            None
        }
    };

    match (longitude, latitude, max_distance_m) {
        (Some(longitude), Some(latitude), Some(max_distance_m)) if violations.is_empty() => {
            Ok(NearbyQuery {
                center: GeoPoint::new(longitude, latitude),
                max_distance_m,
            })
        }
        _ => Err(ValidationError { violations }),
    }
}

fn check_title(raw: &str, violations: &mut Vec<FieldViolation>) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        violations.push(FieldViolation::new("title", "Title is required"));
        return None;
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        violations.push(FieldViolation::new(
            "title",
            format!("Title must be at most {MAX_TITLE_CHARS} characters"),
        ));
        return None;
    }
    Some(trimmed.to_string())
}

fn check_date(raw: &str, violations: &mut Vec<FieldViolation>) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(_) => {
            violations.push(FieldViolation::new(
                "date",
                "Invalid date format, expected RFC 3339",
            ));
            None
        }
    }
}

fn check_location(raw: &LocationInput, violations: &mut Vec<FieldViolation>) -> Option<GeoPoint> {
    let mut ok = true;

    if raw.kind != "Point" {
        violations.push(FieldViolation::new(
            "location.type",
            format!("Location type must be \"Point\", got \"{}\"", raw.kind),
        ));
        ok = false;
    }

    if raw.coordinates.len() != 2 {
        violations.push(FieldViolation::new(
            "location.coordinates",
            "Coordinates must be [longitude, latitude]",
        ));
        return None;
    }

    let longitude = check_coordinate(
        Some(raw.coordinates[0]),
        "location.coordinates[0]",
        &LONGITUDE_RANGE,
        violations,
    );
    let latitude = check_coordinate(
        Some(raw.coordinates[1]),
        "location.coordinates[1]",
        &LATITUDE_RANGE,
        violations,
    );

    match (longitude, latitude) {
        (Some(longitude), Some(latitude)) if ok => Some(GeoPoint::new(longitude, latitude)),
        _ => None,
    }
}

fn check_coordinate(
    value: Option<f64>,
    field: &str,
    range: &std::ops::RangeInclusive<f64>,
    violations: &mut Vec<FieldViolation>,
) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() && range.contains(&v) => Some(v),
        Some(_) => {
            violations.push(FieldViolation::new(
                field,
                format!(
                    "must be a number between {} and {}",
                    range.start(),
                    range.end()
                ),
            ));
            None
        }
        None => {
            violations.push(FieldViolation::new(field, "is required"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateEventInput {
        CreateEventInput {
            title: Some("Launch".to_string()),
            date: Some("2024-01-21T12:00:00Z".to_string()),
            location: Some(LocationInput {
                kind: "Point".to_string(),
                coordinates: vec![-122.4194, 37.7749],
            }),
        }
    }

    #[test]
    fn accepts_a_valid_create_payload() {
        let new_event = validate_create(&valid_create()).expect("should validate");
        assert_eq!(new_event.title, "Launch");
        assert_eq!(new_event.location.longitude, -122.4194);
        assert_eq!(new_event.location.latitude, 37.7749);
        assert_eq!(new_event.date.to_rfc3339(), "2024-01-21T12:00:00+00:00");
    }

    #[test]
    fn accepts_boundary_coordinates() {
        for (lon, lat) in [(-180.0, -90.0), (180.0, 90.0), (0.0, 0.0)] {
            let mut input = valid_create();
            input.location = Some(LocationInput {
                kind: "Point".to_string(),
                coordinates: vec![lon, lat],
            });
            assert!(
                validate_create(&input).is_ok(),
                "({lon}, {lat}) should be accepted"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_coordinates_naming_the_field() {
        let mut input = valid_create();
        input.location = Some(LocationInput {
            kind: "Point".to_string(),
            coordinates: vec![-180.5, 91.0],
        });
        let err = validate_create(&input).unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["location.coordinates[0]", "location.coordinates[1]"]
        );
    }

    #[test]
    fn rejects_nan_coordinates() {
        let mut input = valid_create();
        input.location = Some(LocationInput {
            kind: "Point".to_string(),
            coordinates: vec![f64::NAN, 0.0],
        });
        assert!(validate_create(&input).is_err());
    }

    #[test]
    fn collects_every_violation_for_an_empty_payload() {
        let err = validate_create(&CreateEventInput::default()).unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "date", "location"]);
    }

    #[test]
    fn rejects_non_point_geometry() {
        let mut input = valid_create();
        input.location = Some(LocationInput {
            kind: "Polygon".to_string(),
            coordinates: vec![0.0, 0.0],
        });
        let err = validate_create(&input).unwrap_err();
        assert_eq!(err.violations[0].field, "location.type");
    }

    #[test]
    fn rejects_wrong_coordinate_arity() {
        for coordinates in [vec![], vec![1.0], vec![1.0, 2.0, 3.0]] {
            let mut input = valid_create();
            input.location = Some(LocationInput {
                kind: "Point".to_string(),
                coordinates,
            });
            let err = validate_create(&input).unwrap_err();
            assert_eq!(err.violations[0].field, "location.coordinates");
        }
    }

    #[test]
    fn rejects_titles_outside_length_bounds() {
        let mut input = valid_create();
        input.title = Some("   ".to_string());
        assert!(validate_create(&input).is_err());

        let mut input = valid_create();
        input.title = Some("x".repeat(201));
        assert!(validate_create(&input).is_err());

        let mut input = valid_create();
        input.title = Some("x".repeat(200));
        assert!(validate_create(&input).is_ok());
    }

    #[test]
    fn rejects_unparseable_dates() {
        for bad in ["yesterday", "2024-13-01T00:00:00Z", "2024-01-21"] {
            let mut input = valid_create();
            input.date = Some(bad.to_string());
            let err = validate_create(&input).unwrap_err();
            assert_eq!(err.violations[0].field, "date", "{bad} should be rejected");
        }
    }

    #[test]
    fn accepts_offset_dates_normalized_to_utc() {
        let mut input = valid_create();
        input.date = Some("2024-01-21T14:00:00+02:00".to_string());
        let new_event = validate_create(&input).expect("offset date should parse");
        assert_eq!(new_event.date.to_rfc3339(), "2024-01-21T12:00:00+00:00");
    }

    #[test]
    fn empty_update_is_a_valid_noop() {
        let patch = validate_update(&UpdateEventInput::default()).expect("should validate");
        assert!(patch.is_empty());
    }

    #[test]
    fn partial_update_validates_only_supplied_fields() {
        let input = UpdateEventInput {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let patch = validate_update(&input).expect("should validate");
        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        assert!(patch.date.is_none());
        assert!(patch.location.is_none());
    }

    #[test]
    fn update_rejects_bad_supplied_fields() {
        let input = UpdateEventInput {
            date: Some("not-a-date".to_string()),
            location: Some(LocationInput {
                kind: "Point".to_string(),
                coordinates: vec![200.0, 0.0],
            }),
            ..Default::default()
        };
        let err = validate_update(&input).unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["date", "location.coordinates[0]"]);
    }

    #[test]
    fn nearby_defaults_max_distance_to_10km() {
        let query = validate_nearby(&NearbyParams {
            longitude: Some(-122.42),
            latitude: Some(37.77),
            max_distance: None,
        })
        .expect("should validate");
        assert_eq!(query.max_distance_m, 10_000.0);
    }

    #[test]
    fn nearby_requires_both_coordinates() {
        let err = validate_nearby(&NearbyParams::default()).unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["longitude", "latitude"]);
    }

    #[test]
    fn nearby_rejects_non_positive_max_distance() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = validate_nearby(&NearbyParams {
                longitude: Some(0.0),
                latitude: Some(0.0),
                max_distance: Some(bad),
            })
            .unwrap_err();
            assert_eq!(err.violations[0].field, "maxDistance");
        }
    }

    #[test]
    fn nearby_rejects_out_of_range_center() {
        let err = validate_nearby(&NearbyParams {
            longitude: Some(181.0),
            latitude: Some(-90.1),
            max_distance: Some(500.0),
        })
        .unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["longitude", "latitude"]);
    }
}
