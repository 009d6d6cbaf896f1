#[cfg(test)]
#[path = "../../tests/unit/scenarios/evaluator_test.rs"]
mod evaluator_test;

use super::Distribution;
use crate::construction::constraints::EPSILON;
use crate::models::PlanningPolicy;
use crate::models::common::HOUR;
use crate::models::problem::WorldState;
use crate::models::solution::{Candidate, ObjectiveTerm, ObjectiveVector};
use crate::solver::objectives::{dwell_excess_hours, late_hours};
use crate::utils::{Environment, Float, GenericResult, compare_floats, create_stream_rng, parallel_collect};

/// Scenario sampling settings. Delay distributions are specified in hours, congestion is
/// a factor applied to the route congestion risk and transit time.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioConfig {
    /// Amount of samples, zero means nominal evaluation only.
    pub samples: usize,
    /// Percentile used for worst-case vector, e.g. 0.95.
    pub percentile: Float,
    /// A seed which makes sampling reproducible.
    pub seed: u64,
    /// Extra loading duration in hours.
    pub loading_delay: Distribution,
    /// Extra transit time in hours.
    pub transit_delay: Distribution,
    /// Congestion factor.
    pub congestion: Distribution,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            samples: 32,
            percentile: 0.95,
            seed: 0,
            loading_delay: Distribution::Exponential { rate: 1. },
            transit_delay: Distribution::Exponential { rate: 0.25 },
            congestion: Distribution::Uniform { min: 0., max: 1. },
        }
    }
}

impl ScenarioConfig {
    /// Checks scenario settings.
    pub fn validate(&self) -> GenericResult<()> {
        if !(0. ..=1.).contains(&self.percentile) {
            return Err(format!("percentile must be in [0, 1], got {}", self.percentile).into());
        }

        self.loading_delay.validate()?;
        self.transit_delay.validate()?;
        self.congestion.validate()
    }
}

/// Robustness scores of a solution under sampled perturbations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioScore {
    /// Expected objective vector.
    pub expected: ObjectiveVector,
    /// Worst-case percentile objective vector.
    pub worst_case: ObjectiveVector,
    /// Probability that a dispatched order arrives within its window.
    pub on_time_probability: Float,
    /// Expected total delay in hours.
    pub expected_delay_hours: Float,
}

struct SampleOutcome {
    objectives: ObjectiveVector,
    on_time: usize,
    orders: usize,
    delay_hours: Float,
}

/// Evaluates robustness of every candidate. Samples use the same per-sample seeds for all
/// candidates, so candidates are compared under identical perturbations.
pub fn evaluate_scenarios(
    candidates: &[Candidate],
    world: &WorldState,
    policy: &PlanningPolicy,
    environment: &Environment,
) -> Vec<ScenarioScore> {
    candidates.iter().map(|candidate| evaluate_candidate(candidate, world, policy, environment)).collect()
}

/// Evaluates robustness of a single candidate.
pub fn evaluate_candidate(
    candidate: &Candidate,
    world: &WorldState,
    policy: &PlanningPolicy,
    environment: &Environment,
) -> ScenarioScore {
    let config = &policy.scenario;

    let outcomes = if config.samples == 0 {
        vec![simulate(candidate, world, policy, None)]
    } else {
        let samples = (0..config.samples as u64).collect::<Vec<_>>();
        environment
            .parallelism
            .execute(|| parallel_collect(&samples, |&sample| simulate(candidate, world, policy, Some(sample))))
    };

    aggregate(outcomes, config.percentile)
}

fn simulate(candidate: &Candidate, world: &WorldState, policy: &PlanningPolicy, sample: Option<u64>) -> SampleOutcome {
    let config = &policy.scenario;
    let tariff = &policy.tariff;
    let mut rng = sample.map(|sample| create_stream_rng(config.seed, sample));

    let mut outcome = SampleOutcome {
        objectives: ObjectiveVector { utilization: candidate.objectives.utilization, ..ObjectiveVector::default() },
        on_time: 0,
        orders: 0,
        delay_hours: 0.,
    };

    // cost does not depend on perturbations
    outcome.objectives.cost = candidate.objectives.cost;

    candidate.solution.compositions.iter().for_each(|composition| {
        let route = world.route(composition.route);

        let (loading_extra, transit_extra) = match rng.as_mut() {
            Some(rng) => {
                let loading_delay = config.loading_delay.sample(rng).max(0.) * HOUR;
                let transit_delay = config.transit_delay.sample(rng).max(0.) * HOUR;
                let congestion = config.congestion.sample(rng).max(0.) * route.congestion_risk * route.transit_time;
                (loading_delay, transit_delay + congestion)
            }
            None => (0., 0.),
        };

        let dispatch = composition.dispatch.max(composition.loading.end + loading_extra);
        let arrival = dispatch + route.transit_time + transit_extra;

        let late = late_hours(composition, world, arrival);
        outcome.delay_hours += late;
        outcome.objectives.delay_penalty += late * tariff.penalty_rate;
        outcome.objectives.demurrage +=
            dwell_excess_hours(composition, world, dispatch - composition.loading.start) * tariff.demurrage_rate;

        outcome.orders += composition.orders.len();
        outcome.on_time +=
            composition.orders.iter().filter(|&&order| arrival <= world.orders[order].window.end + EPSILON).count();
    });

    outcome
}

fn aggregate(outcomes: Vec<SampleOutcome>, percentile: Float) -> ScenarioScore {
    let count = outcomes.len().max(1) as Float;

    let mean = |term: ObjectiveTerm| outcomes.iter().map(|outcome| outcome.objectives.get(term)).sum::<Float>() / count;
    let worst = |term: ObjectiveTerm| {
        let mut values = outcomes.iter().map(|outcome| outcome.objectives.get(term)).collect::<Vec<_>>();
        values.sort_by(|a, b| compare_floats(*a, *b));

        let percentile = if term.is_maximized() { 1. - percentile } else { percentile };
        let index = ((percentile * values.len() as Float).ceil() as usize).clamp(1, values.len().max(1)) - 1;

        values.get(index).copied().unwrap_or_default()
    };

    let (on_time, orders) =
        outcomes.iter().fold((0, 0), |(on_time, orders), outcome| (on_time + outcome.on_time, orders + outcome.orders));

    ScenarioScore {
        expected: ObjectiveVector {
            cost: mean(ObjectiveTerm::Cost),
            delay_penalty: mean(ObjectiveTerm::Delay),
            utilization: mean(ObjectiveTerm::Utilization),
            demurrage: mean(ObjectiveTerm::Demurrage),
        },
        worst_case: ObjectiveVector {
            cost: worst(ObjectiveTerm::Cost),
            delay_penalty: worst(ObjectiveTerm::Delay),
            utilization: worst(ObjectiveTerm::Utilization),
            demurrage: worst(ObjectiveTerm::Demurrage),
        },
        on_time_probability: if orders == 0 { 1. } else { on_time as Float / orders as Float },
        expected_delay_hours: outcomes.iter().map(|outcome| outcome.delay_hours).sum::<Float>() / count,
    }
}
