//! Pragmatic crate defines a JSON boundary format for the rake formation engine: a snapshot of
//! orders, wagons, loading points, routes and materials is read and validated before it is mapped
//! to the core model, and a published dispatch plan is written back with compositions, deferred
//! orders, scores and explanations.
//!
//! A plan written in this format can be re-checked against its snapshot using the
//! [`checker`] module.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

#[cfg(test)]
#[path = "../tests/features/mod.rs"]
pub mod features;

#[cfg(test)]
#[path = "../tests/discovery/mod.rs"]
pub mod discovery;

pub use rake_core as core;

pub mod checker;
pub mod format;

mod utils;
mod validation;

use rake_core::prelude::{Float, GenericError};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Formats unix timestamp in seconds as RFC3339 string.
pub fn format_time(time: Float) -> String {
    OffsetDateTime::from_unix_timestamp(time.round() as i64)
        .ok()
        .and_then(|time| time.format(&Rfc3339).ok())
        .unwrap_or_else(|| format!("{time}"))
}

/// Parses RFC3339 string into unix timestamp in seconds.
pub fn parse_time(time: &str) -> Result<Float, GenericError> {
    OffsetDateTime::parse(time, &Rfc3339)
        .map(|time| time.unix_timestamp() as Float)
        .map_err(|err| format!("cannot parse time '{time}': {err}").into())
}
