//! # Position
//!
//! Normalizes raw live pings into a single canonical [`PositionUpdate`].
//! Upstream senders disagree on field names (`lat`/`latitude`,
//! `driver_id`/`driverId`, ...); every accepted spelling is listed in
//! [`FIELD_ALIASES`].

use realtime::fields::{self, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const LAT: &str = "lat";
const LNG: &str = "lng";
const DRIVER_ID: &str = "driverId";
const TRIP_ID: &str = "tripId";
const SPEED: &str = "speed";

/// Canonical field name and the raw keys it is resolved from, in priority
/// order.
pub const FIELD_ALIASES: [(&str, &[&str]); 5] = [
    (LAT, &["lat", "latitude"]),
    (LNG, &["lng", "longitude"]),
    (DRIVER_ID, &["driver_id", "driverId"]),
    (TRIP_ID, &["trip_id", "tripId"]),
    (SPEED, &["speed"]),
];

/// A live ping after normalization. `lat`/`lng` are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,

    /// Raw fields carried through untouched.
    #[serde(flatten)]
    pub fields: Record,
}

/// Normalizes a raw ping.
///
/// Returns `None` when the payload is not an object or either coordinate does
/// not resolve to a number. A `None` here is the only validity gate on the
/// live path: callers drop the ping.
#[must_use]
pub fn normalize(raw: &Value) -> Option<PositionUpdate> {
    let Value::Object(record) = raw else {
        return None;
    };

    let lat = resolve(record, LAT)?.as_f64()?;
    let lng = resolve(record, LNG)?.as_f64()?;
    let driver_id = resolve(record, DRIVER_ID).and_then(fields::identifier);
    let trip_id = resolve(record, TRIP_ID).and_then(fields::identifier);
    let speed = resolve(record, SPEED).and_then(Value::as_f64);

    let mut passthrough = record.clone();
    for key in [LAT, LNG, DRIVER_ID, TRIP_ID] {
        passthrough.remove(key);
    }
    if speed.is_some() {
        passthrough.remove(SPEED);
    }

    Some(PositionUpdate { driver_id, trip_id, lat, lng, speed, fields: passthrough })
}

fn resolve<'a>(record: &'a Record, canonical: &str) -> Option<&'a Value> {
    let (_, keys) = FIELD_ALIASES.iter().find(|(name, _)| *name == canonical)?;
    fields::first_present(record, keys)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn long_form_coordinates() {
        let update = normalize(&json!({"latitude": 12.9, "longitude": 77.6})).expect("valid");
        assert!((update.lat - 12.9).abs() < f64::EPSILON);
        assert!((update.lng - 77.6).abs() < f64::EPSILON);
        assert_eq!(update.driver_id, None);
    }

    #[test]
    fn short_form_preferred() {
        let raw = json!({"lat": 1.5, "latitude": 9.0, "lng": 2.5, "longitude": 9.0});
        let update = normalize(&raw).expect("valid");
        assert!((update.lat - 1.5).abs() < f64::EPSILON);
        assert!((update.lng - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_coordinates() {
        assert!(normalize(&json!({"driver_id": "d-1"})).is_none());
        assert!(normalize(&json!({"lat": 1.0})).is_none());
        assert!(normalize(&json!({"longitude": 1.0})).is_none());
        assert!(normalize(&json!({"lat": "12.9", "lng": 77.6})).is_none());
        assert!(normalize(&json!([1.0, 2.0])).is_none());
    }

    #[test]
    fn identifiers_resolved() {
        let raw = json!({"lat": 1.0, "lng": 2.0, "driver_id": "d-1", "tripId": "t-1"});
        let update = normalize(&raw).expect("valid");
        assert_eq!(update.driver_id.as_deref(), Some("d-1"));
        assert_eq!(update.trip_id.as_deref(), Some("t-1"));
    }

    #[test]
    fn snake_case_wins_over_camel_case() {
        let raw = json!({"lat": 1.0, "lng": 2.0, "driver_id": 7, "driverId": "d-2"});
        let update = normalize(&raw).expect("valid");
        assert_eq!(update.driver_id.as_deref(), Some("7"));
    }

    #[test]
    fn passthrough_fields() {
        let raw = json!({
            "latitude": 1.0, "longitude": 2.0, "driver_id": "d-1",
            "speed": 42.0, "status": "ON_TRIP", "heading": 90
        });
        let update = normalize(&raw).expect("valid");

        assert_eq!(update.speed, Some(42.0));
        assert_eq!(update.fields.get("status"), Some(&json!("ON_TRIP")));
        assert_eq!(update.fields.get("heading"), Some(&json!(90)));
        assert_eq!(update.fields.get("driver_id"), Some(&json!("d-1")));
        assert!(!update.fields.contains_key("speed"));
        assert!(!update.fields.contains_key("lat"));
    }

    #[test]
    fn serializes_canonical_shape() {
        let raw = json!({"latitude": 1.0, "longitude": 2.0, "trip_id": "t-1"});
        let update = normalize(&raw).expect("valid");
        let value = serde_json::to_value(&update).expect("serialize");

        assert_eq!(value["lat"], json!(1.0));
        assert_eq!(value["lng"], json!(2.0));
        assert_eq!(value["tripId"], json!("t-1"));
        assert_eq!(value["latitude"], json!(1.0));
        assert!(value.get("driverId").is_none());
    }
}
