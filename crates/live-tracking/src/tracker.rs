//! # Tracker
//!
//! Ingest pipeline for the live feed: raw message → normalize → registry →
//! focus decision → live view.

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::Config;
use crate::focus::{self, LivePoint, LiveView};
use crate::locks::DriverLocks;
use crate::position::{self, PositionUpdate};
use crate::registry::DriverRegistry;

/// Outcome of ingesting one ping.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub update: PositionUpdate,

    /// Whether the update was reflected in the live view.
    pub applied: bool,
}

#[derive(Debug)]
pub struct Tracker {
    config: Config,
    registry: DriverRegistry,
    live: Mutex<LiveView>,
    locks: DriverLocks,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Tracker {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let live = Mutex::new(LiveView::new(config.trail_limit));
        Self { config, registry: DriverRegistry::new(), live, locks: DriverLocks::new() }
    }

    /// Ingests one raw message from the live connection.
    ///
    /// Malformed JSON and pings without coordinates are dropped and yield
    /// `None`. `focus` is the driver currently selected by the consumer, if
    /// any.
    pub async fn ingest(&self, payload: &[u8], focus: Option<&str>) -> Option<Ingested> {
        let raw = match serde_json::from_slice::<Value>(payload) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(monotonic_counter.invalid_updates = 1, error = %e, "dropping malformed ping");
                return None;
            }
        };
        self.ingest_value(&raw, focus).await
    }

    /// Ingests one already-parsed message.
    pub async fn ingest_value(&self, raw: &Value, focus: Option<&str>) -> Option<Ingested> {
        let Some(update) = position::normalize(raw) else {
            debug!(monotonic_counter.invalid_updates = 1, "dropping ping without coordinates");
            return None;
        };

        let _guard = match update.driver_id.as_deref() {
            Some(driver_id) => Some(self.locks.lock(driver_id).await),
            None => None,
        };

        self.registry.upsert(&update);
        if let Some(max_age) = self.config.stale_after {
            self.registry.evict_stale(Utc::now(), max_age);
        }

        let applied = focus::should_apply(&update, focus);
        if applied {
            self.live.lock().await.apply(&update);
        } else {
            debug!(
                driver_id = update.driver_id.as_deref().unwrap_or_default(),
                "update outside focus"
            );
        }

        debug!(
            monotonic_counter.ingested_updates = 1,
            driver_id = update.driver_id.as_deref().unwrap_or_default(),
            applied
        );
        Some(Ingested { update, applied })
    }

    #[must_use]
    pub const fn registry(&self) -> &DriverRegistry {
        &self.registry
    }

    /// A copy of the live view.
    pub async fn live_view(&self) -> LiveView {
        self.live.lock().await.clone()
    }

    /// Shows a reconstructed path on the live view.
    pub async fn show_path(&self, points: Vec<LivePoint>) {
        self.live.lock().await.show_path(points);
    }

    /// Clears the registry and the live view.
    ///
    /// Connection churn never calls this; drivers keep their last position
    /// across reconnects.
    pub async fn reset(&self) {
        self.registry.clear();
        self.live.lock().await.clear();
    }
}
