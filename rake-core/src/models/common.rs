//! Common primitives shared by problem and solution models.

#[cfg(test)]
#[path = "../../tests/unit/models/common_test.rs"]
mod common_test;

use crate::utils::Float;

/// Specifies a point in time, seconds since an arbitrary epoch.
pub type Timestamp = Float;

/// Specifies a duration in seconds.
pub type Duration = Float;

/// Specifies a mass in tonnes.
pub type Tonnes = Float;

/// Specifies a distance in kilometres.
pub type Distance = Float;

/// Amount of seconds in one hour.
pub const HOUR: Duration = 3600.;

/// Amount of seconds in one day.
pub const DAY: Duration = 24. * HOUR;

/// Represents a time window.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeWindow {
    /// Start of time window.
    pub start: Timestamp,
    /// End of time window.
    pub end: Timestamp,
}

impl TimeWindow {
    /// Creates a new [`TimeWindow`].
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Returns unlimited time window.
    pub fn max() -> Self {
        Self { start: 0., end: Float::MAX }
    }

    /// Checks whether time window has an intersection with another one (inclusive).
    pub fn intersects(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Checks whether time window has a positive length overlap with another one.
    /// Touching windows do not overlap: a booking may start exactly when another one ends.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Checks whether time window contains given time window.
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Returns duration of overlap with another window, zero when there is no overlap.
    pub fn overlap_duration(&self, other: &Self) -> Duration {
        (self.end.min(other.end) - self.start.max(other.start)).max(0.)
    }

    /// Returns duration of the time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks whether the time window is well formed.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start <= self.end
    }
}
