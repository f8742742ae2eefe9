use std::env;
use std::str::FromStr;

use chrono::Duration;

/// Tracker tuning, read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of points kept on the live trail; 0 keeps every point.
    pub trail_limit: usize,

    /// Drivers not heard from for this long are evicted. `None` never evicts.
    pub stale_after: Option<Duration>,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_source(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let trail_limit = parse(&lookup, "LIVE_TRAIL_LIMIT").unwrap_or(0);
        let stale_after = parse::<i64>(&lookup, "DRIVER_STALE_AFTER_SECS")
            .filter(|secs| *secs > 0)
            .map(Duration::seconds);

        Self { trail_limit, stale_after }
    }
}

fn parse<T: FromStr>(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|value| value.trim().parse::<T>().ok())
}
