use super::{Front, MultiObjective};
use crate::utils::Float;

/// A solution with assigned rank and crowding distance.
pub struct AssignedCrowdingDistance<'a, S>
where
    S: 'a,
{
    /// Index of the solution in the original collection.
    pub index: usize,
    /// A reference to solution.
    pub solution: &'a S,
    /// Rank of the front solution belongs to.
    pub rank: usize,
    /// Crowding distance, bigger is better.
    pub crowding_distance: Float,
}

/// Assigns a crowding distance to each solution in `front`.
pub fn assign_crowding_distance<'a, S>(
    front: &Front<'a, S>,
    multi_objective: &impl MultiObjective<Solution = S>,
) -> Vec<AssignedCrowdingDistance<'a, S>> {
    let mut a: Vec<_> = front
        .iter()
        .map(|(solution, index)| AssignedCrowdingDistance { index, solution, rank: front.rank(), crowding_distance: 0. })
        .collect();

    if a.is_empty() {
        return a;
    }

    let objective_count = multi_objective.objectives().count().max(1);

    multi_objective.objectives().for_each(|objective| {
        // first, sort according to objective, keep index order for determinism
        a.sort_by(|a, b| objective.total_order(a.solution, b.solution).then_with(|| a.index.cmp(&b.index)));

        // assign infinite crowding distance to the extremes
        let last = a.len() - 1;
        a[0].crowding_distance = Float::INFINITY;
        a[last].crowding_distance = Float::INFINITY;

        // the distance between the "best" and "worst" solution according to "objective"
        let spread = objective.distance(a[0].solution, a[last].solution).abs();

        if spread > 0. {
            let norm = 1. / (spread * (objective_count as Float));

            for i in 1..last {
                let distance = objective.distance(a[i + 1].solution, a[i - 1].solution).abs();
                a[i].crowding_distance += distance * norm;
            }
        }
    });

    a
}
