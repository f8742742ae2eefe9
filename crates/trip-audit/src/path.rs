//! # Path
//!
//! Points on a reconstructed trip path and the milestone events that mark
//! trip progress.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use realtime::fields::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trip lifecycle milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Start,
    Pickup,
    Dropoff,
    End,
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "START" => Ok(Self::Start),
            "PICKUP" => Ok(Self::Pickup),
            "DROPOFF" => Ok(Self::Dropoff),
            "END" => Ok(Self::End),
            other => Err(format!("unknown milestone event type: {other}")),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Start => "START",
            Self::Pickup => "PICKUP",
            Self::Dropoff => "DROPOFF",
            Self::End => "END",
        };
        f.write_str(s)
    }
}

/// One sample on a trip path: a location ping or a milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    pub lat: f64,
    pub lng: f64,

    /// `None` when the source timestamp was missing or unreadable.
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,

    /// Additional milestone fields.
    #[serde(flatten)]
    pub fields: Record,
}

impl PathPoint {
    /// Keys a serialized point owns; additional fields may not reuse them.
    pub const KEYS: [&'static str; 5] = ["lat", "lng", "timestamp", "speed", "eventType"];

    #[must_use]
    pub fn new(lat: f64, lng: f64, timestamp: Option<DateTime<Utc>>) -> Self {
        Self { lat, lng, timestamp, speed: None, event_type: None, fields: Record::new() }
    }

    /// A point is usable only with both coordinates set. An exact `0` is
    /// the upstream "no fix" sentinel.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite() && self.lat != 0.0 && self.lng != 0.0
    }
}

/// Parses an upstream timestamp.
///
/// Accepts RFC 3339 strings, zone-less ISO date-times (read as UTC), epoch
/// milliseconds, and `[year, month, day, hour, minute, second, nanos]`
/// arrays.
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_str(s),
        Value::Number(n) => {
            #[allow(clippy::cast_possible_truncation)]
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        Value::Array(parts) => parse_parts(parts),
        _ => None,
    }
}

fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn parse_parts(parts: &[Value]) -> Option<DateTime<Utc>> {
    let part = |i: usize| -> Option<u32> {
        parts.get(i).map_or(Some(0), |v| v.as_u64().and_then(|n| u32::try_from(n).ok()))
    };
    if parts.len() < 3 {
        return None;
    }

    let year = i32::try_from(parts[0].as_i64()?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, part(1)?, part(2)?)?;
    let naive = date.and_hms_nano_opt(part(3)?, part(4)?, part(5)?, part(6)?)?;
    Some(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn zero_is_no_fix() {
        assert!(!PathPoint::new(0.0, 0.0, None).is_valid());
        assert!(!PathPoint::new(12.9, 0.0, None).is_valid());
        assert!(!PathPoint::new(0.0, 77.6, None).is_valid());
        assert!(PathPoint::new(12.9, 77.6, None).is_valid());
        assert!(PathPoint::new(-33.8, -70.6, None).is_valid());
    }

    #[test]
    fn event_type_parsing() {
        assert_eq!("PICKUP".parse::<EventType>(), Ok(EventType::Pickup));
        assert_eq!("dropoff".parse::<EventType>(), Ok(EventType::Dropoff));
        assert!("ARRIVED".parse::<EventType>().is_err());
        assert_eq!(EventType::End.to_string(), "END");
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap();

        assert_eq!(parse_timestamp(&json!("2026-03-01T08:30:00Z")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2026-03-01T14:00:00+05:30")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2026-03-01T08:30:00")), Some(expected));
        assert_eq!(parse_timestamp(&json!("2026-03-01T08:30:00.000")), Some(expected));
        assert_eq!(parse_timestamp(&json!(expected.timestamp_millis())), Some(expected));
        assert_eq!(parse_timestamp(&json!([2026, 3, 1, 8, 30])), Some(expected));
    }

    #[test]
    fn unreadable_timestamps() {
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
        assert_eq!(parse_timestamp(&json!([2026, 13, 1])), None);
        assert_eq!(parse_timestamp(&json!({"at": 1})), None);
    }
}
