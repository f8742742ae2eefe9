//! # Live Focus
//!
//! Decides which updates drive the single "current location" view, and holds
//! that view.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::position::PositionUpdate;

/// Whether `update` should be reflected in the live view.
///
/// With no focused driver every update applies; otherwise only updates from
/// the focused driver do. The focus is passed in by the caller on every call
/// and never read from shared state.
#[must_use]
pub fn should_apply(update: &PositionUpdate, focused_driver_id: Option<&str>) -> bool {
    focused_driver_id.is_none_or(|focused| update.driver_id.as_deref() == Some(focused))
}

/// A point as shown on the live view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
}

impl From<&PositionUpdate> for LivePoint {
    fn from(update: &PositionUpdate) -> Self {
        Self {
            lat: update.lat,
            lng: update.lng,
            speed: update.speed,
            driver_id: update.driver_id.clone(),
            trip_id: update.trip_id.clone(),
        }
    }
}

/// Current location and trail of the live view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveView {
    pub location: Option<LivePoint>,
    pub path: VecDeque<LivePoint>,

    /// Maximum trail length; 0 keeps every point.
    #[serde(skip)]
    trail_limit: usize,
}

impl LiveView {
    #[must_use]
    pub fn new(trail_limit: usize) -> Self {
        Self { trail_limit, ..Self::default() }
    }

    /// Sets the current location and appends it to the trail.
    pub fn apply(&mut self, update: &PositionUpdate) {
        let point = LivePoint::from(update);
        self.path.push_back(point.clone());
        self.location = Some(point);
        self.truncate();
    }

    /// Replaces the trail with `points` and makes the last one current.
    ///
    /// An empty path leaves the view unchanged.
    pub fn show_path(&mut self, points: Vec<LivePoint>) {
        let Some(last) = points.last().cloned() else {
            return;
        };
        self.path = points.into();
        self.location = Some(last);
        self.truncate();
    }

    pub fn clear(&mut self) {
        self.location = None;
        self.path.clear();
    }

    fn truncate(&mut self) {
        if self.trail_limit == 0 {
            return;
        }
        while self.path.len() > self.trail_limit {
            self.path.pop_front();
        }
    }
}
