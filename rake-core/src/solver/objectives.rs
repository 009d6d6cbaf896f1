//! Objective evaluation and dominance relation used by the search.

#[cfg(test)]
#[path = "../../tests/unit/solver/objectives_test.rs"]
mod objectives_test;

use crate::algorithms::nsga2::{MultiObjective, Objective, dominance_order, non_dominated_sort};
use crate::models::PlanningPolicy;
use crate::models::common::HOUR;
use crate::models::problem::WorldState;
use crate::models::solution::{Candidate, ObjectiveVector, RakeComposition, Solution};
use crate::utils::Float;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::sync::Arc;

/// Calculates objective vector of the solution.
pub fn evaluate(solution: &Solution, world: &WorldState, policy: &PlanningPolicy) -> ObjectiveVector {
    let tariff = &policy.tariff;

    let (cost, delay_penalty, demurrage) =
        solution.compositions.iter().fold((0., 0., 0.), |(cost, delay, demurrage), composition| {
            (
                cost + composition_cost(composition, world, policy),
                delay + delay_hours(composition, world) * tariff.penalty_rate,
                demurrage + demurrage_hours(composition, world) * tariff.demurrage_rate,
            )
        });

    let (sum, count) = solution
        .compositions
        .iter()
        .flat_map(|composition| composition.wagon_utilizations(world))
        .fold((0., 0), |(sum, count), value| (sum + value, count + 1));
    let utilization = if count == 0 { 0. } else { sum / count as Float };

    ObjectiveVector { cost, delay_penalty, utilization, demurrage }
}

/// Returns freight cost of the composition: distance times tariff times tonnes plus handling cost.
pub fn composition_cost(composition: &RakeComposition, world: &WorldState, policy: &PlanningPolicy) -> Float {
    let distance = world.route(composition.route).distance;
    distance * policy.tariff.per_tonne_km * composition.total_load() + policy.tariff.handling_cost
}

/// Returns total amount of late hours over all orders of the composition.
pub fn delay_hours(composition: &RakeComposition, world: &WorldState) -> Float {
    late_hours(composition, world, composition.arrival)
}

/// Returns total amount of late hours if the composition arrives at the given time.
pub(crate) fn late_hours(composition: &RakeComposition, world: &WorldState, arrival: Float) -> Float {
    composition.orders.iter().map(|&order| (arrival - world.orders[order].window.end).max(0.) / HOUR).sum()
}

/// Returns wagon hours of dwell above free time.
pub fn demurrage_hours(composition: &RakeComposition, world: &WorldState) -> Float {
    dwell_excess_hours(composition, world, composition.dispatch - composition.loading.start)
}

pub(crate) fn dwell_excess_hours(composition: &RakeComposition, world: &WorldState, dwell: Float) -> Float {
    let free_time = world.loading_points[composition.loading_point].free_time;
    (dwell - free_time).max(0.) / HOUR * composition.wagons().len() as Float
}

/// Creates an evaluated candidate.
pub fn create_candidate(solution: Solution, world: &WorldState, policy: &PlanningPolicy) -> Candidate {
    let objectives = evaluate(&solution, world, policy);
    Candidate { solution: Arc::new(solution), objectives }
}

struct TermObjective {
    fitness_fn: fn(&ObjectiveVector) -> Float,
}

impl Objective for TermObjective {
    type Solution = Candidate;

    fn fitness(&self, solution: &Self::Solution) -> Float {
        (self.fitness_fn)(&solution.objectives)
    }
}

/// A dominance relation: fewer deferred orders first, then Pareto dominance over cost, delay,
/// utilization (maximized) and demurrage.
pub struct RakeMultiObjective {
    objectives: Vec<TermObjective>,
}

impl Default for RakeMultiObjective {
    fn default() -> Self {
        Self {
            objectives: vec![
                TermObjective { fitness_fn: |vector| vector.cost },
                TermObjective { fitness_fn: |vector| vector.delay_penalty },
                TermObjective { fitness_fn: |vector| -vector.utilization },
                TermObjective { fitness_fn: |vector| vector.demurrage },
            ],
        }
    }
}

impl MultiObjective for RakeMultiObjective {
    type Solution = Candidate;

    fn total_order(&self, a: &Self::Solution, b: &Self::Solution) -> Ordering {
        a.deferred_count().cmp(&b.deferred_count()).then_with(|| dominance_order(a, b, self.objectives()))
    }

    fn objectives<'a>(
        &'a self,
    ) -> Box<dyn Iterator<Item = &'a (dyn Objective<Solution = Self::Solution> + Send + Sync)> + 'a> {
        Box::new(self.objectives.iter().map(|objective| objective as &(dyn Objective<Solution = Candidate> + Send + Sync)))
    }
}

/// Removes structural duplicates keeping the first occurrence.
pub fn dedup_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut known = FxHashSet::default();

    candidates
        .into_iter()
        .filter(|candidate| known.insert((candidate.solution.key(), candidate.solution.deferred_orders())))
        .collect()
}

/// Returns unique non-dominated candidates in their original order.
pub fn select_front(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let candidates = dedup_candidates(candidates);
    let objective = RakeMultiObjective::default();

    let indices = non_dominated_sort(candidates.as_slice(), &objective).indices().to_vec();

    indices.into_iter().map(|idx| candidates[idx].clone()).collect()
}
