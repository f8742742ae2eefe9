#![allow(missing_docs)]

use std::any::Any;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow, bail};
use bytes::Bytes;
use http::{Request, Response, StatusCode};
use realtime::{Config, HttpRequest};
use serde_json::Value;

/// Serves canned audit service responses keyed by request path.
#[derive(Clone, Default)]
pub struct MockProvider {
    routes: HashMap<String, (StatusCode, Bytes)>,
    offline: bool,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    #[allow(unused)]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(unused)]
    #[must_use]
    pub fn with_json(mut self, path: &str, body: &Value) -> Self {
        let bytes = serde_json::to_vec(body).expect("serialize body");
        self.routes.insert(path.to_string(), (StatusCode::OK, Bytes::from(bytes)));
        self
    }

    #[allow(unused)]
    #[must_use]
    pub fn with_status(mut self, path: &str, status: StatusCode) -> Self {
        self.routes.insert(path.to_string(), (status, Bytes::from_static(b"upstream says no")));
        self
    }

    #[allow(unused)]
    #[must_use]
    pub fn with_raw(mut self, path: &str, body: &'static [u8]) -> Self {
        self.routes.insert(path.to_string(), (StatusCode::OK, Bytes::from_static(body)));
        self
    }

    #[allow(unused)]
    #[must_use]
    pub const fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    #[allow(unused)]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock").clone()
    }
}

impl HttpRequest for MockProvider {
    async fn fetch<T>(&self, request: Request<T>) -> Result<Response<Bytes>>
    where
        T: http_body::Body + Any + Send,
        T::Data: Into<Vec<u8>>,
        T::Error: Into<Box<dyn Error + Send + Sync + 'static>>,
    {
        let path = request.uri().path().to_string();
        self.requests.lock().expect("lock").push(request.uri().to_string());

        if self.offline {
            bail!("connection refused");
        }

        let Some((status, body)) = self.routes.get(&path) else {
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Bytes::new())
                .context("failed to build response");
        };

        Response::builder().status(*status).body(body.clone()).context("failed to build response")
    }
}

impl Config for MockProvider {
    async fn get(&self, key: &str) -> Result<String> {
        match key {
            "AUDIT_URL" => Ok("http://localhost:8081/api/v1/".to_string()),
            _ => Err(anyhow!("unknown config key: {key}")),
        }
    }
}
