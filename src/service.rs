//! # Dispatch Service
//!
//! Composes the live tracker and trip reconstruction over one provider.

use live_tracking::{Config, DriverState, Ingested, LivePoint, LiveView, Tracker};
use realtime::{Provider, Result, bad_request};
use serde::Serialize;
use tracing::info;
use trip_audit::{PathPoint, Segment, TripSummary};

/// A reconstructed trip ready to be shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripView {
    pub summary: TripSummary,
    pub path: Vec<PathPoint>,
    pub segments: Vec<Segment>,

    /// Last point on the path.
    pub current: Option<PathPoint>,

    /// Driver to select so live updates follow this trip.
    pub focus: Option<String>,
}

#[derive(Debug)]
pub struct Dispatch<P> {
    provider: P,
    tracker: Tracker,
}

impl<P: Provider> Dispatch<P> {
    pub fn new(provider: P, config: Config) -> Self {
        Self { provider, tracker: Tracker::new(config) }
    }

    /// Creates a service with tracker settings read from the environment.
    pub fn from_env(provider: P) -> Self {
        Self::new(provider, Config::from_env())
    }

    #[must_use]
    pub const fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Handles one message from the live connection.
    pub async fn on_message(&self, payload: &[u8], focus: Option<&str>) -> Option<Ingested> {
        self.tracker.ingest(payload, focus).await
    }

    /// Latest state of every known driver, ordered by driver id.
    #[must_use]
    pub fn drivers(&self) -> Vec<DriverState> {
        self.tracker.registry().snapshot()
    }

    pub async fn live(&self) -> LiveView {
        self.tracker.live_view().await
    }

    /// Reconstructs `trip_id` and shows its path on the live view.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an empty trip id, `NotFound` when the trip has
    /// no audit, and `Upstream` when the audit service fails.
    pub async fn open_trip(&self, trip_id: &str) -> Result<TripView> {
        if trip_id.trim().is_empty() {
            return Err(bad_request!("trip id is required"));
        }

        let trip = trip_audit::reconstruct(trip_id, &self.provider).await?;
        let segments = trip_audit::segment(&trip.path);
        let current = trip.current().cloned();
        let focus = trip.summary.driver_id.clone();

        let points = trip
            .path
            .iter()
            .map(|point| LivePoint {
                lat: point.lat,
                lng: point.lng,
                speed: point.speed,
                driver_id: focus.clone(),
                trip_id: Some(trip_id.to_string()),
            })
            .collect();
        self.tracker.show_path(points).await;

        info!(
            trip_id = %trip_id,
            segments = segments.len(),
            driver_id = focus.as_deref().unwrap_or_default(),
            "opened trip"
        );

        Ok(TripView { summary: trip.summary, path: trip.path, segments, current, focus })
    }

    /// Summaries of every audited trip.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` when the audit service fails.
    pub async fn history(&self) -> Result<Vec<TripSummary>> {
        trip_audit::history(&self.provider).await
    }
}
