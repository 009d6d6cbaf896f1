#[cfg(test)]
#[path = "../../../rake-core/tests/helpers/macros.rs"]
#[macro_use]
pub mod macros;

use crate::format_time;

/// Planning start used by test snapshots: 2024-01-01T00:00:00Z.
pub const TEST_START: i64 = 1_704_067_200;

/// Returns RFC3339 time shifted from the test start by the given amount of hours.
pub fn at_hours(hours: f64) -> String {
    format_time(TEST_START as f64 + hours * 3600.)
}

pub use self::snapshot::*;

pub use self::solver::*;
