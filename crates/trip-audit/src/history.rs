//! # Audit History
//!
//! Summaries of every audited trip, in the order the audit service returns
//! them.

use realtime::{Config, HttpRequest, Result};
use tracing::debug;

use crate::audit;
use crate::summary::TripSummary;

/// Lists a summary of every audited trip.
///
/// # Errors
///
/// Returns `Upstream` when the audit service fails.
pub async fn history<P>(provider: &P) -> Result<Vec<TripSummary>>
where
    P: Config + HttpRequest,
{
    let audits = audit::fetch_all(provider).await?;
    debug!(count = audits.len(), "fetched audit history");
    Ok(audits.iter().map(TripSummary::from).collect())
}
