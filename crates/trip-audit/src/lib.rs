//! # Trip Audit
//!
//! Reconstructs the route of a trip from its audit record: location pings and
//! milestones merged into one ordered path, split into purpose-tagged
//! segments.

pub mod audit;
pub mod history;
pub mod path;
pub mod reconstruct;
pub mod segment;
pub mod summary;

pub use self::audit::TripAudit;
pub use self::history::history;
pub use self::path::{EventType, PathPoint};
pub use self::reconstruct::{Reconstruction, reconstruct};
pub use self::segment::{Segment, SegmentKind, segment};
pub use self::summary::TripSummary;
