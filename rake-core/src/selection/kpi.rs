#[cfg(test)]
#[path = "../../tests/unit/selection/kpi_test.rs"]
mod kpi_test;

use crate::construction::constraints::EPSILON;
use crate::models::common::Tonnes;
use crate::models::problem::WorldState;
use crate::models::solution::Candidate;
use crate::scenarios::ScenarioScore;
use crate::utils::Float;

/// Target average wagon utilization.
pub const UTILIZATION_TARGET: Float = 0.85;

/// Target maximum share of demurrage in freight cost.
pub const DEMURRAGE_SHARE_TARGET: Float = 0.02;

/// Key performance indicators of a dispatch plan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Kpis {
    /// Freight and handling cost per dispatched tonne-km.
    pub cost_per_tonne_km: Float,
    /// Share of dispatched orders arriving within the delivery window in the nominal schedule.
    pub on_time_ratio: Float,
    /// Probability that every dispatched order arrives on time under sampled scenarios.
    pub expected_on_time_ratio: Float,
    /// Average wagon utilization.
    pub average_utilization: Float,
    /// Demurrage as a share of freight cost.
    pub demurrage_share: Float,
    /// Dispatched tonnage.
    pub dispatched_tonnage: Tonnes,
    /// Deferred tonnage.
    pub deferred_tonnage: Tonnes,
    /// Amount of rakes.
    pub rakes: usize,
    /// Amount of wagons used.
    pub wagons: usize,
}

impl Kpis {
    /// Returns true if utilization and demurrage targets are met.
    pub fn meets_targets(&self) -> bool {
        self.average_utilization >= UTILIZATION_TARGET && self.demurrage_share <= DEMURRAGE_SHARE_TARGET
    }
}

/// Calculates plan KPIs for the chosen candidate.
pub fn calculate_kpis(candidate: &Candidate, robustness: &ScenarioScore, world: &WorldState) -> Kpis {
    let solution = candidate.solution.as_ref();

    let (tonne_km, dispatched_tonnage) =
        solution.compositions.iter().fold((0., 0.), |(tonne_km, tonnage), composition| {
            let load = composition.total_load();
            (tonne_km + load * world.route(composition.route).distance, tonnage + load)
        });

    let (on_time, dispatched) = solution
        .compositions
        .iter()
        .flat_map(|composition| composition.orders.iter().map(move |&order| (composition, order)))
        .fold((0_usize, 0_usize), |(on_time, total), (composition, order)| {
            let is_on_time = composition.arrival <= world.orders[order].window.end + EPSILON;
            (on_time + usize::from(is_on_time), total + 1)
        });

    let deferred_tonnage = solution.deferred.iter().map(|deferral| world.orders[deferral.order].quantity).sum();
    let objectives = &candidate.objectives;

    Kpis {
        cost_per_tonne_km: if tonne_km > EPSILON { objectives.cost / tonne_km } else { 0. },
        on_time_ratio: if dispatched > 0 { on_time as Float / dispatched as Float } else { 1. },
        expected_on_time_ratio: robustness.on_time_probability,
        average_utilization: objectives.utilization,
        demurrage_share: if objectives.cost > EPSILON { objectives.demurrage / objectives.cost } else { 0. },
        dispatched_tonnage,
        deferred_tonnage,
        rakes: solution.compositions.len(),
        wagons: solution.compositions.iter().map(|composition| composition.wagons().len()).sum(),
    }
}
