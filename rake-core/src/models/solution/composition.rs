use crate::construction::constraints::ViolationSet;
use crate::models::common::{TimeWindow, Timestamp, Tonnes};
use crate::models::problem::WorldState;
use crate::utils::Float;
use std::fmt::{Display, Formatter};

/// Specifies a load of one order put on one wagon.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    /// Order index in the snapshot.
    pub order: usize,
    /// Wagon index in the snapshot.
    pub wagon: usize,
    /// Load in tonnes.
    pub load: Tonnes,
}

/// A composition draft: what the search manipulates before wagons and times are decided.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RakeDraft {
    /// Loading point index.
    pub loading_point: usize,
    /// Route chain index.
    pub route: usize,
    /// Order indices in loading sequence.
    pub orders: Vec<usize>,
}

/// A rake: wagons with assigned loads sharing one loading point and one route chain.
#[derive(Clone, Debug, PartialEq)]
pub struct RakeComposition {
    /// Loading point index.
    pub loading_point: usize,
    /// Route chain index.
    pub route: usize,
    /// Siding index at the loading point.
    pub siding: usize,
    /// Order indices in loading sequence.
    pub orders: Vec<usize>,
    /// Order to wagon assignments.
    pub assignments: Vec<Assignment>,
    /// Loading time window on the siding.
    pub loading: TimeWindow,
    /// Dispatch time.
    pub dispatch: Timestamp,
    /// Arrival time at destination.
    pub arrival: Timestamp,
}

impl RakeComposition {
    /// Returns a draft of the composition.
    pub fn draft(&self) -> RakeDraft {
        RakeDraft { loading_point: self.loading_point, route: self.route, orders: self.orders.clone() }
    }

    /// Returns distinct wagons with their total loads in assignment order.
    pub fn wagon_loads(&self) -> Vec<(usize, Tonnes)> {
        self.assignments.iter().fold(Vec::<(usize, Tonnes)>::new(), |mut acc, assignment| {
            match acc.iter_mut().find(|(wagon, _)| *wagon == assignment.wagon) {
                Some((_, load)) => *load += assignment.load,
                None => acc.push((assignment.wagon, assignment.load)),
            }
            acc
        })
    }

    /// Returns distinct wagon indices.
    pub fn wagons(&self) -> Vec<usize> {
        self.wagon_loads().into_iter().map(|(wagon, _)| wagon).collect()
    }

    /// Returns total load on board.
    pub fn total_load(&self) -> Tonnes {
        self.assignments.iter().map(|assignment| assignment.load).sum()
    }

    /// Returns load of the given order.
    pub fn order_load(&self, order: usize) -> Tonnes {
        self.assignments.iter().filter(|assignment| assignment.order == order).map(|assignment| assignment.load).sum()
    }

    /// Returns per-wagon utilization averaged over all wagons.
    pub fn utilization(&self, world: &WorldState) -> Float {
        let (sum, count) = self.wagon_utilizations(world).fold((0., 0), |(sum, count), value| (sum + value, count + 1));

        if count == 0 { 0. } else { sum / count as Float }
    }

    /// Returns utilization of every wagon.
    pub fn wagon_utilizations<'a>(&self, world: &'a WorldState) -> impl Iterator<Item = Float> + 'a {
        self.wagon_loads().into_iter().map(move |(wagon, load)| (load / world.wagons[wagon].capacity).clamp(0., 1.))
    }

    /// Returns gross weight: loads plus tare weight of every wagon.
    pub fn gross_weight(&self, world: &WorldState) -> Tonnes {
        self.wagon_loads().into_iter().map(|(wagon, load)| load + world.wagons[wagon].profile.tare).sum()
    }
}

/// A reason why an order was not dispatched in this cycle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum DeferralReason {
    /// There is no available wagon of an allowed type at the order's plant.
    NoCompatibleWagon,
    /// The order cannot be loaded in one rake.
    InfeasibleSize,
    /// Hard deadline cannot be met even with an empty loading point.
    WindowMissed,
    /// Resources are consumed by other compositions.
    CapacityExhausted,
}

impl DeferralReason {
    /// Returns a machine readable code.
    pub fn code(&self) -> &'static str {
        match self {
            DeferralReason::NoCompatibleWagon => "NO_COMPATIBLE_WAGON",
            DeferralReason::InfeasibleSize => "INFEASIBLE_SIZE",
            DeferralReason::WindowMissed => "WINDOW_MISSED",
            DeferralReason::CapacityExhausted => "CAPACITY_EXHAUSTED",
        }
    }
}

impl Display for DeferralReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A deferred order.
#[derive(Clone, Debug, PartialEq)]
pub struct Deferral {
    /// Order index in the snapshot.
    pub order: usize,
    /// Deferral reason.
    pub reason: DeferralReason,
    /// Constraints which prevented the order from being dispatched.
    pub violations: ViolationSet,
}
