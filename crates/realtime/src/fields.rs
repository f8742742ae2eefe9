//! # Fields
//!
//! Lookups over loosely-shaped JSON records whose keys arrive under more than
//! one spelling. Callers describe the spellings as data (an alias table) and
//! resolve them here.

use serde_json::{Map, Value};

/// A JSON object as received from upstream.
pub type Record = Map<String, Value>;

/// Returns the first value among `keys` that is present.
///
/// A value is absent when the key is missing, `null`, or an empty string.
#[must_use]
pub fn first_present<'a>(record: &'a Record, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| record.get(*key)).find(|value| is_present(value))
}

/// Returns the first present value among `keys`, trying each record in order.
#[must_use]
pub fn first_present_in<'a>(records: &[&'a Record], keys: &[&str]) -> Option<&'a Value> {
    records.iter().find_map(|record| first_present(record, keys))
}

/// Renders an identifier carried as either a JSON string or number.
#[must_use]
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        let Value::Object(map) = value else { panic!("expected object") };
        map
    }

    #[test]
    fn first_alias_wins() {
        let rec = record(json!({"driver_id": "d-1", "driverId": "d-2"}));
        assert_eq!(first_present(&rec, &["driver_id", "driverId"]), Some(&json!("d-1")));
    }

    #[test]
    fn null_and_empty_fall_through() {
        let rec = record(json!({"driver_id": "", "driverId": null, "driver": "d-3"}));
        assert_eq!(first_present(&rec, &["driver_id", "driverId"]), None);
        assert_eq!(first_present(&rec, &["driver_id", "driverId", "driver"]), Some(&json!("d-3")));
    }

    #[test]
    fn falls_back_across_records() {
        let primary = record(json!({"passengerName": ""}));
        let fallback = record(json!({"passengerName": "Asha"}));
        assert_eq!(
            first_present_in(&[&primary, &fallback], &["passengerName"]),
            Some(&json!("Asha"))
        );
    }

    #[test]
    fn numeric_identifiers() {
        assert_eq!(identifier(&json!(42)), Some("42".to_string()));
        assert_eq!(identifier(&json!("d-9")), Some("d-9".to_string()));
        assert_eq!(identifier(&json!(true)), None);
        assert_eq!(identifier(&json!("")), None);
    }
}
