#[cfg(test)]
#[path = "../../../tests/unit/models/solution/partition_test.rs"]
mod partition_test;

use super::*;
use crate::utils::Float;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// A partition of the backlog into rake compositions and a deferred set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Solution {
    /// Compositions in booking sequence.
    pub compositions: Vec<RakeComposition>,
    /// Deferred orders sorted by order index.
    pub deferred: Vec<Deferral>,
}

/// Identifies a solution structure: drafts with their sidings in booking sequence.
pub type SolutionKey = Vec<(usize, usize, usize, Vec<usize>)>;

/// Specifies where an order is placed in the solution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Placement {
    /// Order is in the composition with the given index.
    Composition(usize),
    /// Order is deferred.
    Deferred,
    /// Order is not present in the solution.
    Missing,
}

impl Solution {
    /// Returns drafts of all compositions.
    pub fn drafts(&self) -> Vec<RakeDraft> {
        self.compositions.iter().map(|composition| composition.draft()).collect()
    }

    /// Returns indices of deferred orders.
    pub fn deferred_orders(&self) -> Vec<usize> {
        self.deferred.iter().map(|deferral| deferral.order).collect()
    }

    /// Returns a structural key of the solution.
    pub fn key(&self) -> SolutionKey {
        self.compositions
            .iter()
            .map(|composition| {
                (composition.loading_point, composition.route, composition.siding, composition.orders.clone())
            })
            .collect()
    }

    /// Returns placement of the order.
    pub fn locate(&self, order: usize) -> Placement {
        if let Some(idx) = self.compositions.iter().position(|composition| composition.orders.contains(&order)) {
            Placement::Composition(idx)
        } else if self.deferred.iter().any(|deferral| deferral.order == order) {
            Placement::Deferred
        } else {
            Placement::Missing
        }
    }

    /// Checks that every order index in `0..order_count` appears exactly once.
    pub fn is_partition_of(&self, order_count: usize) -> bool {
        let mut seen = vec![0_usize; order_count];
        let placed = self
            .compositions
            .iter()
            .flat_map(|composition| composition.orders.iter().copied())
            .chain(self.deferred.iter().map(|deferral| deferral.order));

        for order in placed {
            match seen.get_mut(order) {
                Some(count) => *count += 1,
                None => return false,
            }
        }

        seen.iter().all(|&count| count == 1)
    }

    /// Returns a sequence of order ids used to break ties: compositions in booking sequence.
    pub fn order_sequence<'a>(&self, world: &'a crate::models::problem::WorldState) -> Vec<&'a str> {
        self.compositions
            .iter()
            .flat_map(|composition| composition.orders.iter().map(|&order| world.orders[order].id.as_str()))
            .collect()
    }
}

/// An objective term.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ObjectiveTerm {
    /// Transportation cost.
    Cost,
    /// Delay penalty.
    Delay,
    /// Wagon utilization.
    Utilization,
    /// Demurrage.
    Demurrage,
}

impl ObjectiveTerm {
    /// All terms in default lexicographic order.
    pub const ALL: [ObjectiveTerm; 4] =
        [ObjectiveTerm::Cost, ObjectiveTerm::Delay, ObjectiveTerm::Utilization, ObjectiveTerm::Demurrage];

    /// Returns true when bigger value of the term is better.
    pub fn is_maximized(&self) -> bool {
        matches!(self, ObjectiveTerm::Utilization)
    }
}

impl Display for ObjectiveTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectiveTerm::Cost => "cost",
            ObjectiveTerm::Delay => "delay",
            ObjectiveTerm::Utilization => "utilization",
            ObjectiveTerm::Demurrage => "demurrage",
        };

        write!(f, "{name}")
    }
}

/// A vector of objective values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectiveVector {
    /// Freight and handling cost.
    pub cost: Float,
    /// Delay penalty.
    pub delay_penalty: Float,
    /// Average wagon utilization in [0, 1].
    pub utilization: Float,
    /// Demurrage charges.
    pub demurrage: Float,
}

impl ObjectiveVector {
    /// Returns a value of the given term.
    pub fn get(&self, term: ObjectiveTerm) -> Float {
        match term {
            ObjectiveTerm::Cost => self.cost,
            ObjectiveTerm::Delay => self.delay_penalty,
            ObjectiveTerm::Utilization => self.utilization,
            ObjectiveTerm::Demurrage => self.demurrage,
        }
    }

    /// Returns a component-wise difference `self - other`.
    pub fn delta(&self, other: &ObjectiveVector) -> ObjectiveVector {
        ObjectiveVector {
            cost: self.cost - other.cost,
            delay_penalty: self.delay_penalty - other.delay_penalty,
            utilization: self.utilization - other.utilization,
            demurrage: self.demurrage - other.demurrage,
        }
    }
}

/// A solution evaluated by the objective function.
#[derive(Clone, Debug)]
pub struct Candidate {
    /// A solution.
    pub solution: Arc<Solution>,
    /// Its objective vector.
    pub objectives: ObjectiveVector,
}

impl Candidate {
    /// Returns amount of deferred orders.
    pub fn deferred_count(&self) -> usize {
        self.solution.deferred.len()
    }
}
