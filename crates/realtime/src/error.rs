//! Dispatch errors
//!
//! Invalid live pings never become an [`Error`]; they are dropped where they
//! are normalized. Everything here is surfaced to the caller.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Result type used across the crate.
pub type Result<T> = anyhow::Result<T, Error>;

#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Error {
    /// The caller asked for something that cannot be served.
    #[error("code: 400, description: {0}")]
    BadRequest(String),

    /// No record exists for the requested trip.
    #[error("code: 404, description: {0}")]
    NotFound(String),

    /// A remote service failed or could not be reached. `status` is the
    /// upstream HTTP status when a response was received.
    #[error("code: 502, description: {detail}{}", upstream_status(.status))]
    Upstream { status: Option<u16>, detail: String },

    /// A payload could not be decoded.
    #[error("code: 500, description: invalid_format {0}")]
    InvalidFormat(String),

    #[error("code: 500, description: {0}")]
    Internal(String),
}

#[allow(clippy::ref_option)]
fn upstream_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (upstream status {s})")).unwrap_or_default()
}

impl Error {
    /// Upstream failure that produced a response with `status`.
    #[must_use]
    pub fn upstream(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::Upstream { status: Some(status.as_u16()), detail: detail.into() }
    }

    #[must_use]
    pub const fn code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::InvalidFormat(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message without the status code prefix.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::BadRequest(d) | Self::NotFound(d) | Self::InvalidFormat(d) | Self::Internal(d) => {
                d.clone()
            }
            Self::Upstream { status, detail } => format!("{detail}{}", upstream_status(status)),
        }
    }

    // Message as constructed, without the upstream status.
    fn detail(&self) -> &str {
        match self {
            Self::BadRequest(d)
            | Self::NotFound(d)
            | Self::InvalidFormat(d)
            | Self::Internal(d)
            | Self::Upstream { detail: d, .. } => d,
        }
    }

    // Same variant, new message.
    fn describe(&self, description: String) -> Self {
        match self {
            Self::BadRequest(_) => Self::BadRequest(description),
            Self::NotFound(_) => Self::NotFound(description),
            Self::Upstream { status, .. } => Self::Upstream { status: *status, detail: description },
            Self::InvalidFormat(_) => Self::InvalidFormat(description),
            Self::Internal(_) => Self::Internal(description),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        // context first, the domain error's own description last
        let mut parts: Vec<String> = Vec::new();
        for cause in err.chain() {
            match cause.downcast_ref::<Self>() {
                Some(inner) => {
                    parts.push(inner.detail().to_string());
                    let description = parts.join(": ");
                    tracing::debug!(error = %inner, description, "rewrapping domain error");
                    return inner.describe(description);
                }
                None => parts.push(cause.to_string()),
            }
        }
        Self::Internal(parts.join(": "))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidFormat(err.to_string())
    }
}

/// [`Error`] rendered as a JSON response carrying its status code.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    description: String,
}

impl From<Error> for HttpError {
    fn from(e: Error) -> Self {
        Self { status: e.code(), description: e.description() }
    }
}

impl From<anyhow::Error> for HttpError {
    fn from(e: anyhow::Error) -> Self {
        Self::from(Error::from(e))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = json!({"code": self.status.as_u16(), "description": self.description});
        (self.status, Json(body)).into_response()
    }
}

#[macro_export]
macro_rules! bad_request {
    ($($arg:tt)*) => {
        $crate::Error::BadRequest(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! not_found {
    ($($arg:tt)*) => {
        $crate::Error::NotFound(format!($($arg)*))
    };
}

/// Upstream failure without a response, such as a refused connection.
#[macro_export]
macro_rules! upstream {
    ($($arg:tt)*) => {
        $crate::Error::Upstream { status: None, detail: format!($($arg)*) }
    };
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, anyhow};
    use axum::response::IntoResponse;
    use http::StatusCode;
    use serde_json::Value;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Registry, fmt};

    use super::{Error, HttpError};

    #[test]
    fn upstream_display() {
        let err = Error::upstream(StatusCode::SERVICE_UNAVAILABLE, "audit service");
        assert_eq!(err.to_string(), "code: 502, description: audit service (upstream status 503)");

        let err = crate::upstream!("audit service unreachable: {}", "connection refused");
        assert_eq!(err.to_string(), "code: 502, description: audit service unreachable: connection refused");
    }

    #[test]
    fn context_keeps_variant() {
        let _ = Registry::default().with(EnvFilter::new("debug")).with(fmt::layer()).try_init();

        let lookup = || -> Result<(), Error> {
            Err(Error::NotFound("trip t-1".to_string()))
                .context("fetching audit")
                .context("opening trip")?;
            Ok(())
        };

        assert_eq!(
            lookup().unwrap_err(),
            Error::NotFound("opening trip: fetching audit: trip t-1".to_string())
        );
    }

    #[test]
    fn context_keeps_upstream_status() {
        let result = Err::<(), Error>(Error::upstream(StatusCode::BAD_GATEWAY, "audit service"))
            .context("fetching audit");
        let err: Error = result.unwrap_err().into();

        assert_eq!(
            err,
            Error::Upstream { status: Some(502), detail: "fetching audit: audit service".to_string() }
        );
        assert_eq!(err.description(), "fetching audit: audit service (upstream status 502)");
    }

    #[test]
    fn foreign_errors_are_internal() {
        let result = Err::<(), anyhow::Error>(anyhow!("disk on fire")).context("loading config");
        let err: Error = result.unwrap_err().into();
        assert_eq!(err, Error::Internal("loading config: disk on fire".to_string()));

        let err: Error = serde_json::from_str::<Value>(r#"{"lat": "#).unwrap_err().into();
        assert!(matches!(err, Error::InvalidFormat(_)));
        assert_eq!(err.code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn http_status() {
        let response = HttpError::from(Error::NotFound("trip".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = HttpError::from(crate::upstream!("down")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = HttpError::from(anyhow!(crate::bad_request!("empty trip id"))).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
