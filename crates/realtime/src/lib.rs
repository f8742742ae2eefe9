//! # Realtime Core
//!
//! Core modules shared by the dispatch tracking crates.

mod error;
mod provider;

pub mod fields;

pub use crate::error::*;
pub use crate::provider::*;
