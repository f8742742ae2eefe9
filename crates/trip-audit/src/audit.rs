//! # Trip Audit
//!
//! Retrieval of trip audit records from the audit service.

use anyhow::Context;
use bytes::Bytes;
use http::header::ACCEPT;
use http::{Method, StatusCode};
use http_body_util::Empty;
use realtime::fields::Record;
use realtime::{Config, Error, HttpRequest, Result, not_found, upstream};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::path::{self, EventType, PathPoint};

/// Authoritative record of one trip: summary fields, location pings, and
/// milestones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripAudit {
    #[serde(default, deserialize_with = "null_as_default")]
    pub locations: Vec<LocationRecord>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub milestones: Vec<MilestoneRecord>,

    /// Embedded trip record, consulted when a summary field is missing on
    /// the audit itself. Anything other than an object is ignored.
    #[serde(default, deserialize_with = "object_or_none", skip_serializing_if = "Option::is_none")]
    pub trip: Option<Record>,

    #[serde(flatten)]
    pub fields: Record,
}

/// Raw location ping as stored by the audit service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRecord {
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    pub timestamp: Option<Value>,
    #[serde(deserialize_with = "lenient_f64")]
    pub speed: Option<f64>,
}

impl LocationRecord {
    /// `None` when either coordinate is missing.
    #[must_use]
    pub fn to_point(&self) -> Option<PathPoint> {
        let timestamp = self.timestamp.as_ref().and_then(path::parse_timestamp);
        let mut point = PathPoint::new(self.latitude?, self.longitude?, timestamp);
        point.speed = self.speed;
        Some(point)
    }
}

/// Raw milestone as stored by the audit service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneRecord {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub event_type: Option<Value>,

    #[serde(flatten)]
    pub fields: Record,
}

impl MilestoneRecord {
    /// `None` when either coordinate is missing. Unrecognized event types
    /// yield a point without an event type, the raw value kept under
    /// `eventType`. Extra fields named like a point field are dropped, except
    /// a numeric `speed`.
    #[must_use]
    pub fn to_point(&self) -> Option<PathPoint> {
        let timestamp = self.timestamp.as_ref().and_then(path::parse_timestamp);
        let mut point = PathPoint::new(self.latitude?, self.longitude?, timestamp);
        point.speed = self.fields.get("speed").and_then(Value::as_f64);
        point.fields = self
            .fields
            .iter()
            .filter(|(key, _)| !PathPoint::KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        match self.event_type.as_ref() {
            Some(Value::String(s)) => match s.parse::<EventType>() {
                Ok(event) => point.event_type = Some(event),
                Err(_) => {
                    point.fields.insert("eventType".to_string(), Value::String(s.clone()));
                }
            },
            Some(other) => {
                point.fields.insert("eventType".to_string(), other.clone());
            }
            None => {}
        }
        Some(point)
    }
}

/// Fetches the audit record for `trip_id`.
///
/// # Errors
///
/// Returns `NotFound` when the service has no audit for the trip, and
/// `Upstream` when the request fails, the service answers with an error
/// status, or the payload is not an audit record.
pub async fn fetch<P>(trip_id: &str, provider: &P) -> Result<TripAudit>
where
    P: Config + HttpRequest,
{
    let url = Config::get(provider, "AUDIT_URL").await.context("getting `AUDIT_URL`")?;
    let url = format!("{}/audits/{}", url.trim_end_matches('/'), urlencoding::encode(trip_id));

    let body = get(&url, provider).await?.ok_or_else(|| not_found!("no audit for trip {trip_id}"))?;
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| upstream!("decoding audit for trip {trip_id}: {e}"))?;

    let record = match value {
        Value::Array(items) => {
            warn!(trip_id = %trip_id, count = items.len(), "audit service returned an array");
            items.into_iter().next().unwrap_or(Value::Null)
        }
        other => other,
    };
    if record.is_null() {
        return Err(not_found!("no audit for trip {trip_id}"));
    }

    decode(record).map_err(|e| upstream!("decoding audit for trip {trip_id}: {e}"))
}

/// Fetches every audit record.
///
/// A payload that is not an array is treated as an empty listing; elements
/// that are not audit records are skipped.
///
/// # Errors
///
/// Returns `Upstream` when the request fails or the service answers with an
/// error status.
pub async fn fetch_all<P>(provider: &P) -> Result<Vec<TripAudit>>
where
    P: Config + HttpRequest,
{
    let url = Config::get(provider, "AUDIT_URL").await.context("getting `AUDIT_URL`")?;
    let url = format!("{}/audits", url.trim_end_matches('/'));

    let Some(body) = get(&url, provider).await? else {
        return Ok(vec![]);
    };
    let value: Value =
        serde_json::from_slice(&body).map_err(|e| upstream!("decoding audits: {e}"))?;

    let Value::Array(items) = value else {
        warn!("audit listing is not an array");
        return Ok(vec![]);
    };

    let audits = items
        .into_iter()
        .filter_map(|item| match decode(item) {
            Ok(audit) => Some(audit),
            Err(e) => {
                warn!(monotonic_counter.skipped_audits = 1, error = %e, "skipping audit");
                None
            }
        })
        .collect();
    Ok(audits)
}

// Returns `None` for a 404 so callers can decide what "missing" means.
async fn get<P>(url: &str, provider: &P) -> Result<Option<Bytes>>
where
    P: HttpRequest,
{
    let request = http::Request::builder()
        .method(Method::GET)
        .uri(url)
        .header(ACCEPT, "application/json")
        .body(Empty::<Bytes>::new())
        .context("building audit request")?;

    let response = HttpRequest::fetch(provider, request)
        .await
        .map_err(|e| upstream!("audit service request failed: {e}"))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !status.is_success() {
        return Err(Error::upstream(status, "audit service request failed"));
    }

    Ok(Some(response.into_body()))
}

fn decode(value: Value) -> serde_json::Result<TripAudit> {
    serde_json::from_value(value)
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn object_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<Record>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(record)) => Ok(Some(record)),
        _ => Ok(None),
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}
