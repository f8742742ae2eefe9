//! # Trip Path Reconstruction
//!
//! Merges a trip's location pings and milestones into one time-ordered path.

use realtime::{Config, HttpRequest, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audit::{self, TripAudit};
use crate::path::PathPoint;
use crate::summary::TripSummary;

/// A trip's summary and its ordered, filtered path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconstruction {
    pub summary: TripSummary,
    pub path: Vec<PathPoint>,
}

impl Reconstruction {
    /// The latest point on the path, shown as the trip's current position.
    #[must_use]
    pub fn current(&self) -> Option<&PathPoint> {
        self.path.last()
    }
}

/// Fetches the audit for `trip_id` and reconstructs its path.
///
/// # Errors
///
/// Returns `NotFound` when the trip has no audit and `Upstream` when the
/// audit service fails.
pub async fn reconstruct<P>(trip_id: &str, provider: &P) -> Result<Reconstruction>
where
    P: Config + HttpRequest,
{
    let audit = audit::fetch(trip_id, provider).await?;
    let reconstruction = Reconstruction::from(&audit);

    info!(
        trip_id = %trip_id,
        locations = audit.locations.len(),
        milestones = audit.milestones.len(),
        points = reconstruction.path.len(),
        "reconstructed trip path"
    );
    Ok(reconstruction)
}

impl From<&TripAudit> for Reconstruction {
    fn from(audit: &TripAudit) -> Self {
        Self { summary: TripSummary::from(audit), path: merge(audit) }
    }
}

/// Location points followed by milestone points, stably sorted by timestamp,
/// with invalid points removed. Points without a readable timestamp sort
/// first.
#[must_use]
pub fn merge(audit: &TripAudit) -> Vec<PathPoint> {
    let locations = audit.locations.iter().filter_map(audit::LocationRecord::to_point);
    let milestones = audit.milestones.iter().filter_map(audit::MilestoneRecord::to_point);

    let mut path: Vec<_> = locations.chain(milestones).collect();
    path.sort_by_key(|point| point.timestamp);
    path.retain(PathPoint::is_valid);
    path
}
