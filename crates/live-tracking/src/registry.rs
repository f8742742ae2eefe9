//! # Driver Registry
//!
//! Process-wide map of driver id to the latest known [`DriverState`].

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::position::PositionUpdate;

/// Latest known state of one driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverState {
    pub driver_id: String,
    pub trip_id: Option<String>,
    pub last_position: PositionUpdate,
    pub last_update_time: DateTime<Utc>,
}

/// Registry of live drivers. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct DriverRegistry {
    drivers: Arc<DashMap<String, DriverState>>,
}

impl DriverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `update` stamped with the current time.
    ///
    /// Updates without a driver id are ignored.
    pub fn upsert(&self, update: &PositionUpdate) {
        self.upsert_at(update, Utc::now());
    }

    /// Records `update` stamped with `received_at`. The previous entry for the
    /// driver, if any, is replaced wholesale.
    pub fn upsert_at(&self, update: &PositionUpdate, received_at: DateTime<Utc>) {
        let Some(driver_id) = update.driver_id.clone() else {
            return;
        };

        let state = DriverState {
            driver_id: driver_id.clone(),
            trip_id: update.trip_id.clone(),
            last_position: update.clone(),
            last_update_time: received_at,
        };
        self.drivers.insert(driver_id, state);
    }

    #[must_use]
    pub fn get(&self, driver_id: &str) -> Option<DriverState> {
        self.drivers.get(driver_id).map(|entry| entry.value().clone())
    }

    /// Copies of every entry, ordered by driver id.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DriverState> {
        let mut drivers: Vec<_> = self.drivers.iter().map(|entry| entry.value().clone()).collect();
        drivers.sort_by(|a, b| a.driver_id.cmp(&b.driver_id));
        drivers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Removes entries not updated within `max_age` of `now`, returning how
    /// many were removed.
    pub fn evict_stale(&self, now: DateTime<Utc>, max_age: Duration) -> usize {
        let cutoff = now - max_age;
        let before = self.drivers.len();
        self.drivers.retain(|driver_id, state| {
            let keep = state.last_update_time >= cutoff;
            if !keep {
                debug!(monotonic_counter.evicted_drivers = 1, driver_id = %driver_id);
            }
            keep
        });
        before.saturating_sub(self.drivers.len())
    }

    pub fn clear(&self) {
        self.drivers.clear();
    }
}
