//! This module provides functionality to validate snapshot definition for logical correctness.

use crate::format::snapshot::*;
use crate::format::{FormatError, MultiFormatError};
use crate::parse_time;
use crate::utils::get_duplicates;

mod fleet;
use self::fleet::validate_fleet;

mod network;
use self::network::validate_network;

mod orders;
use self::orders::validate_orders;

/// Keeps snapshot and some of its indices used by validation rules.
pub struct ValidationContext<'a> {
    /// Snapshot to be validated.
    pub snapshot: &'a Snapshot,
}

impl<'a> ValidationContext<'a> {
    /// Creates an instance of `ValidationContext`.
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Validates snapshot on set of rules.
    pub fn validate(&self) -> Result<(), MultiFormatError> {
        let errors = validate_orders(self)
            .err()
            .into_iter()
            .chain(validate_fleet(self).err())
            .chain(validate_network(self).err())
            .flatten()
            .collect::<Vec<_>>();

        if errors.is_empty() { Ok(()) } else { Err(errors.into()) }
    }

    fn orders(&self) -> impl Iterator<Item = &Order> {
        self.snapshot.orders.iter()
    }

    fn wagons(&self) -> impl Iterator<Item = &Wagon> {
        self.snapshot.wagons.iter()
    }

    fn loading_points(&self) -> impl Iterator<Item = &LoadingPoint> {
        self.snapshot.loading_points.iter()
    }
}

/// Parses time window of two RFC3339 times.
fn parse_time_window(window: &[String]) -> Option<(f64, f64)> {
    match window {
        [start, end] => parse_time(start).ok().zip(parse_time(end).ok()),
        _ => None,
    }
}

/// Checks that time window has two valid RFC3339 times and is not inverted.
fn is_valid_time_window(window: &[String]) -> bool {
    parse_time_window(window).is_some_and(|(start, end)| start <= end)
}

/// Returns error with ids when they are present.
fn check_ids(code: &str, cause: &str, action: &str, ids: Vec<String>) -> Result<(), FormatError> {
    if ids.is_empty() {
        Ok(())
    } else {
        Err(FormatError::new(code.to_string(), cause.to_string(), format!("{action}, ids: '{}'", ids.join(", "))))
    }
}
