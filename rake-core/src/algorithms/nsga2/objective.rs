use crate::utils::{Float, compare_floats};
use std::cmp::Ordering;

/// An *objective* defines a *total ordering relation* and a *distance metric* on a set of
/// `solutions`. Given any two solutions, an objective answers the following two questions:
///
/// - "which solution is the better one" (total order)
/// - "how similar are the two solutions" (distance metric)
pub trait Objective {
    /// The solution value type that we define the objective on.
    type Solution;

    /// An objective defines a total ordering between any two solution values.
    ///
    /// This answers the question, is solution `a` better, equal or worse than solution `b`,
    /// according to the objective.
    fn total_order(&self, a: &Self::Solution, b: &Self::Solution) -> Ordering {
        compare_floats(self.fitness(a), self.fitness(b))
    }

    /// An objective defines a distance metric between any two solution values.
    ///
    /// A zero value would mean, that both solutions are in fact the same according to the objective.
    fn distance(&self, a: &Self::Solution, b: &Self::Solution) -> Float {
        self.fitness(a) - self.fitness(b)
    }

    /// An objective fitness value for given `solution`, smaller is better.
    fn fitness(&self, solution: &Self::Solution) -> Float;
}

/// A multi objective: a dominance relation on top of individual objectives.
pub trait MultiObjective {
    /// The solution value type that we define the objective on.
    type Solution;

    /// Returns dominance order: `Less` if `a` dominates `b`, `Greater` if `b` dominates `a`,
    /// `Equal` if they are mutually non-dominated.
    fn total_order(&self, a: &Self::Solution, b: &Self::Solution) -> Ordering;

    /// Returns the individual objectives used for crowding estimation.
    fn objectives<'a>(&'a self) -> Box<dyn Iterator<Item = &'a (dyn Objective<Solution = Self::Solution> + Send + Sync)> + 'a>;
}

/// Calculates Pareto dominance order of two solutions using multiple objectives.
pub fn dominance_order<'a, S: 'a>(
    a: &S,
    b: &S,
    objectives: impl Iterator<Item = &'a (dyn Objective<Solution = S> + Send + Sync)>,
) -> Ordering {
    let mut less_cnt = 0;
    let mut greater_cnt = 0;

    for objective in objectives {
        match objective.total_order(a, b) {
            Ordering::Less => less_cnt += 1,
            Ordering::Greater => greater_cnt += 1,
            Ordering::Equal => {}
        }
    }

    if less_cnt > 0 && greater_cnt == 0 {
        Ordering::Less
    } else if greater_cnt > 0 && less_cnt == 0 {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
