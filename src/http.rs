use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use live_tracking::{DriverState, LiveView};
use realtime::{HttpError, Provider};
use tracing::error;
use trip_audit::TripSummary;

use crate::service::{Dispatch, TripView};

type HttpResult<T> = Result<T, HttpError>;

/// Read-only views over the tracker and the audit service.
pub fn router<P>(dispatch: Arc<Dispatch<P>>) -> Router
where
    P: Provider + 'static,
{
    Router::new()
        .route("/drivers", get(drivers::<P>))
        .route("/live", get(live::<P>))
        .route("/trips/{trip_id}", get(trip::<P>))
        .route("/audits", get(audits::<P>))
        .with_state(dispatch)
}

async fn drivers<P: Provider>(State(dispatch): State<Arc<Dispatch<P>>>) -> Json<Vec<DriverState>> {
    Json(dispatch.drivers())
}

async fn live<P: Provider>(State(dispatch): State<Arc<Dispatch<P>>>) -> Json<LiveView> {
    Json(dispatch.live().await)
}

async fn trip<P: Provider>(
    State(dispatch): State<Arc<Dispatch<P>>>, Path(trip_id): Path<String>,
) -> HttpResult<Json<TripView>> {
    let view = dispatch.open_trip(&trip_id).await.inspect_err(|e| {
        error!(monotonic_counter.processing_errors = 1, error = %e, trip_id = %trip_id);
    })?;
    Ok(Json(view))
}

async fn audits<P: Provider>(
    State(dispatch): State<Arc<Dispatch<P>>>,
) -> HttpResult<Json<Vec<TripSummary>>> {
    let summaries = dispatch.history().await.inspect_err(|e| {
        error!(monotonic_counter.processing_errors = 1, error = %e);
    })?;
    Ok(Json(summaries))
}
