//! # Dispatch
//!
//! Live driver tracking and trip path reconstruction for a dispatch console.
//! Live pings flow through [`Dispatch::on_message`]; a selected trip is
//! rebuilt from its audit record by [`Dispatch::open_trip`].

mod http;
mod service;

pub use self::http::router;
pub use self::service::{Dispatch, TripView};
