//! # Live Tracking
//!
//! Correlates live position pings with drivers and decides which of them
//! drive the primary live view.

mod config;
mod locks;

pub mod focus;
pub mod position;
pub mod registry;
pub mod tracker;

pub use self::config::Config;
pub use self::focus::{LivePoint, LiveView, should_apply};
pub use self::locks::{DriverGuard, DriverLocks};
pub use self::position::{PositionUpdate, normalize};
pub use self::registry::{DriverRegistry, DriverState};
pub use self::tracker::{Ingested, Tracker};
