use crate::models::common::{TimeWindow, Tonnes};
use crate::utils::Float;

/// Wagon maintenance status.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum WagonStatus {
    /// Wagon can be assigned.
    Available,
    /// Wagon is under maintenance.
    InMaintenance,
    /// Wagon is reserved by already committed plan.
    Reserved,
}

/// A physical profile of a wagon used to check route restrictions.
#[derive(Clone, Debug, PartialEq)]
pub struct WagonProfile {
    /// Tare (empty) weight in tonnes.
    pub tare: Tonnes,
    /// Height over rail in metres.
    pub height: Float,
    /// Track gauge identifier, e.g. "broad".
    pub gauge: String,
}

impl Default for WagonProfile {
    fn default() -> Self {
        Self { tare: 0., height: 0., gauge: "broad".to_string() }
    }
}

/// Represents a physical wagon.
#[derive(Clone, Debug, PartialEq)]
pub struct WagonUnit {
    /// An unique wagon id.
    pub id: String,
    /// Wagon type, e.g. BOXN or BRN.
    pub wagon_type: String,
    /// Rated capacity in tonnes.
    pub capacity: Tonnes,
    /// Current location: a plant name.
    pub location: String,
    /// A window when wagon can be loaded and dispatched.
    pub availability: TimeWindow,
    /// Maintenance status.
    pub status: WagonStatus,
    /// Physical profile.
    pub profile: WagonProfile,
}

impl WagonUnit {
    /// Returns true if wagon can be taken by the planner.
    pub fn is_available(&self) -> bool {
        self.status == WagonStatus::Available
    }
}
