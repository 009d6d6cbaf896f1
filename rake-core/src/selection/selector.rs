#[cfg(test)]
#[path = "../../tests/unit/selection/selector_test.rs"]
mod selector_test;

use crate::models::problem::WorldState;
use crate::models::solution::{Candidate, ObjectiveTerm, ObjectiveVector};
use crate::models::{ObjectiveWeights, PlanningPolicy, SelectionPolicy};
use crate::scenarios::ScenarioScore;
use crate::utils::{Float, compare_floats};
use std::cmp::Ordering;

const TIE_EPSILON: Float = 1E-9;

/// Picks one member of the front according to the selection policy. Only members with the smallest
/// amount of deferred orders are considered. Ties are broken by the highest utilization, then by
/// the lowest order id sequence. Returns `None` for an empty front.
pub fn select_solution(
    front: &[Candidate],
    scores: &[ScenarioScore],
    world: &WorldState,
    policy: &PlanningPolicy,
) -> Option<usize> {
    let min_deferred = front.iter().map(|candidate| candidate.deferred_count()).min()?;
    let eligible = (0..front.len()).filter(|&idx| front[idx].deferred_count() == min_deferred).collect::<Vec<_>>();

    let best = match &policy.selection {
        SelectionPolicy::WeightedSum => {
            let vectors = eligible.iter().map(|&idx| &front[idx].objectives).collect::<Vec<_>>();
            select_by_weighted_sum(&eligible, &vectors, &policy.weights)
        }
        SelectionPolicy::MinWorstCase => {
            let vectors = eligible
                .iter()
                .map(|&idx| scores.get(idx).map_or(&front[idx].objectives, |score| &score.worst_case))
                .collect::<Vec<_>>();
            select_by_weighted_sum(&eligible, &vectors, &policy.weights)
        }
        SelectionPolicy::Lexicographic { order, cost_budget, tolerance } => {
            select_lexicographically(front, &eligible, order, *cost_budget, *tolerance)
        }
    };

    best.into_iter().min_by(|&a, &b| compare_ties(&front[a], &front[b], world).then_with(|| a.cmp(&b)))
}

/// Returns weighted sum of front-normalized objectives for every vector.
pub fn weighted_scores(vectors: &[&ObjectiveVector], weights: &ObjectiveWeights) -> Vec<Float> {
    let ranges = ObjectiveTerm::ALL.map(|term| {
        vectors.iter().map(|vector| vector.get(term)).fold((Float::MAX, Float::MIN), |(min, max), value| {
            (min.min(value), max.max(value))
        })
    });

    vectors
        .iter()
        .map(|vector| {
            ObjectiveTerm::ALL
                .iter()
                .zip(ranges.iter())
                .map(|(&term, &(min, max))| {
                    let range = max - min;
                    let value = vector.get(term);
                    let normalized = if range > TIE_EPSILON {
                        if term.is_maximized() { (max - value) / range } else { (value - min) / range }
                    } else {
                        0.
                    };

                    normalized * weights.get(term)
                })
                .sum()
        })
        .collect()
}

fn select_by_weighted_sum(eligible: &[usize], vectors: &[&ObjectiveVector], weights: &ObjectiveWeights) -> Vec<usize> {
    let scores = weighted_scores(vectors, weights);
    let best = scores.iter().copied().fold(Float::MAX, Float::min);

    eligible.iter().zip(scores.iter()).filter(|(_, score)| **score <= best + TIE_EPSILON).map(|(idx, _)| *idx).collect()
}

fn select_lexicographically(
    front: &[Candidate],
    eligible: &[usize],
    order: &[ObjectiveTerm],
    cost_budget: Option<Float>,
    tolerance: Float,
) -> Vec<usize> {
    let within_budget = cost_budget
        .map(|budget| {
            eligible.iter().copied().filter(|&idx| front[idx].objectives.cost <= budget + TIE_EPSILON).collect::<Vec<_>>()
        })
        .filter(|within| !within.is_empty());

    let mut candidates = within_budget.unwrap_or_else(|| eligible.to_vec());

    for &term in order {
        let values = candidates.iter().map(|&idx| front[idx].objectives.get(term));
        let best = if term.is_maximized() { values.fold(Float::MIN, Float::max) } else { values.fold(Float::MAX, Float::min) };
        let allowed = tolerance * best.abs() + TIE_EPSILON;

        candidates.retain(|&idx| (front[idx].objectives.get(term) - best).abs() <= allowed);
    }

    candidates
}

fn compare_ties(a: &Candidate, b: &Candidate, world: &WorldState) -> Ordering {
    compare_floats(b.objectives.utilization, a.objectives.utilization)
        .then_with(|| a.solution.order_sequence(world).cmp(&b.solution.order_sequence(world)))
}
