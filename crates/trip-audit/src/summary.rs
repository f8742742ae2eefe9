//! # Trip Summary
//!
//! Summary fields are read from the audit record first and from its embedded
//! `trip` record second. Each field may arrive under several keys; the
//! accepted keys live in [`SUMMARY_FIELDS`].

use realtime::fields::{self, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::TripAudit;

/// Summary field name and the record keys it is resolved from, in priority
/// order.
pub const SUMMARY_FIELDS: [(&str, &[&str]); 11] = [
    ("id", &["id", "trip_id"]),
    ("driverId", &["driverId", "driver_id"]),
    ("passengerName", &["passengerName", "passenger_name"]),
    ("passengerPhoneNumber", &["passengerPhoneNumber", "passenger_phone_number"]),
    ("fromLocation", &["fromLocation", "from_location"]),
    ("toLocation", &["toLocation", "to_location"]),
    ("status", &["currentStatus", "current_status", "status"]),
    ("startTime", &["startTime", "start_time"]),
    ("endTime", &["endTime", "end_time"]),
    ("totalDistanceCorporate", &["totalDistanceCorporate", "total_distance_corporate"]),
    ("totalDistanceOwner", &["totalDistanceOwner", "total_distance_owner"]),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: Option<String>,
    pub driver_id: Option<String>,
    pub passenger_name: Option<String>,
    pub passenger_phone_number: Option<String>,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub status: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub total_distance_corporate: f64,
    pub total_distance_owner: f64,
}

impl From<&TripAudit> for TripSummary {
    fn from(audit: &TripAudit) -> Self {
        let empty = Record::new();
        let sources = [&audit.fields, audit.trip.as_ref().unwrap_or(&empty)];
        let text = |name: &str| resolve(&sources, name).and_then(render);
        let distance = |name: &str| resolve(&sources, name).and_then(number).unwrap_or_default();

        Self {
            id: text("id"),
            driver_id: text("driverId"),
            passenger_name: text("passengerName"),
            passenger_phone_number: text("passengerPhoneNumber"),
            from_location: text("fromLocation"),
            to_location: text("toLocation"),
            status: text("status"),
            start_time: text("startTime"),
            end_time: text("endTime"),
            total_distance_corporate: distance("totalDistanceCorporate"),
            total_distance_owner: distance("totalDistanceOwner"),
        }
    }
}

fn resolve<'a>(sources: &[&'a Record], name: &str) -> Option<&'a Value> {
    let (_, keys) = SUMMARY_FIELDS.iter().find(|(field, _)| *field == name)?;
    fields::first_present_in(sources, keys)
}

// Strings and numbers render as text; timestamps sent as arrays or objects
// are kept in their JSON form.
fn render(value: &Value) -> Option<String> {
    fields::identifier(value).or_else(|| match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    })
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
