use crate::models::common::{Duration, HOUR, TimeWindow, Tonnes};
use crate::utils::Float;

/// A loading handling mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum HandlingMode {
    /// Mechanical handling.
    Mechanical,
    /// Manual loading.
    Manual,
    /// Coil handling cranes.
    Crane,
}

/// A reserved interval on a loading point siding.
#[derive(Clone, Debug, PartialEq)]
pub struct Booking {
    /// Siding index within the loading point.
    pub siding: usize,
    /// Reserved interval.
    pub window: TimeWindow,
    /// A reference of the booking owner, e.g. rake or maintenance id.
    pub reference: String,
}

/// Represents a loading point: a shared resource with a booking calendar.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadingPoint {
    /// An unique loading point id.
    pub id: String,
    /// A plant where loading point is located.
    pub plant: String,
    /// Handling mode.
    pub mode: HandlingMode,
    /// Throughput in tonnes per hour.
    pub throughput: Float,
    /// Amount of physical sidings which can be booked independently.
    pub sidings: usize,
    /// Maximum total loading duration within one planning time slice.
    pub slice_capacity: Duration,
    /// Free time allowed for loading before demurrage is charged.
    pub free_time: Duration,
    /// Existing bookings.
    pub bookings: Vec<Booking>,
}

impl LoadingPoint {
    /// Returns loading duration for the given amount of tonnes rounded up to whole seconds.
    pub fn loading_duration(&self, tonnes: Tonnes) -> Duration {
        (tonnes * HOUR / self.throughput).ceil()
    }

    /// Returns bookings of the given siding.
    pub fn siding_bookings(&self, siding: usize) -> impl Iterator<Item = &TimeWindow> + '_ {
        self.bookings.iter().filter(move |booking| booking.siding == siding).map(|booking| &booking.window)
    }
}
