use super::{HandlingMode, Order};

/// Describes which wagons can carry a material and how it can be handled.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSpec {
    /// Material type.
    pub material: String,
    /// Allowed wagon types.
    pub wagon_types: Vec<String>,
    /// Whether a single order of this material may be split across several wagons.
    pub splittable: bool,
    /// Allowed handling modes, empty means any.
    pub handling_modes: Vec<HandlingMode>,
}

impl MaterialSpec {
    /// Checks whether wagon type can carry given order taking into account its own narrowing.
    pub fn allows_wagon(&self, order: &Order, wagon_type: &str) -> bool {
        self.wagon_types.iter().any(|allowed| allowed == wagon_type)
            && (order.wagon_types.is_empty() || order.wagon_types.iter().any(|required| required == wagon_type))
    }

    /// Checks whether material can be handled by the given mode.
    pub fn allows_mode(&self, mode: HandlingMode) -> bool {
        self.handling_modes.is_empty() || self.handling_modes.contains(&mode)
    }
}
