//! # Segments
//!
//! Partitions an ordered trip path into purpose-tagged segments at milestone
//! boundaries. Adjacent segments share their boundary point so each one can
//! be drawn on its own without gaps.

use serde::{Deserialize, Serialize};

use crate::path::{EventType, PathPoint};

/// Purpose of a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentKind {
    /// Driver heading to the pickup.
    PrePickup,
    /// Passenger on board.
    InTrip,
    /// After the passenger left.
    PostDropoff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub kind: SegmentKind,
    pub points: Vec<PathPoint>,
}

impl Segment {
    /// Segments with fewer than two points have no direction.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// Splits `path` into segments.
///
/// `pre-pickup` runs from START (or the first point) to PICKUP (or the last
/// point) and is present for any non-empty path. `in-trip` runs from PICKUP to
/// DROPOFF (or the last point) and needs a PICKUP. `post-dropoff` runs from
/// DROPOFF to END (or the last point) and needs a DROPOFF. The first
/// occurrence of each milestone is used.
#[must_use]
pub fn segment(path: &[PathPoint]) -> Vec<Segment> {
    let Some(last) = path.len().checked_sub(1) else {
        return vec![];
    };
    let first = |event: EventType| path.iter().position(|p| p.event_type == Some(event));

    let start = first(EventType::Start);
    let pickup = first(EventType::Pickup);
    let dropoff = first(EventType::Dropoff);
    let end = first(EventType::End);

    let mut segments = vec![Segment {
        kind: SegmentKind::PrePickup,
        points: span(path, start.unwrap_or(0), pickup.unwrap_or(last)),
    }];

    if let Some(from) = pickup {
        segments.push(Segment {
            kind: SegmentKind::InTrip,
            points: span(path, from, dropoff.unwrap_or(last)),
        });
    }
    if let Some(from) = dropoff {
        segments.push(Segment {
            kind: SegmentKind::PostDropoff,
            points: span(path, from, end.unwrap_or(last)),
        });
    }

    segments
}

// Valid points in `from..=to`; empty when the milestones are out of order.
fn span(path: &[PathPoint], from: usize, to: usize) -> Vec<PathPoint> {
    if from > to {
        return vec![];
    }
    path[from..=to].iter().filter(|p| p.is_valid()).cloned().collect()
}
