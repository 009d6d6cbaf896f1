#[cfg(test)]
#[path = "../../../tests/unit/format/plan/writer_test.rs"]
mod writer_test;

use super::*;
use crate::format_time;
use rake_core::models::solution::{DispatchPlan, ObjectiveVector, RakeComposition};
use rake_core::prelude::{GenericError, WorldState};
use rake_core::scenarios::ScenarioScore;
use rake_core::selection::{AlternativeTarget, Kpis as CoreKpis, OrderExplanation as CoreOrderExplanation, OrderPlacement};
use std::io::{BufWriter, Write};

type ApiPlan = super::model::Plan;

/// A trait to serialize dispatch plan in pragmatic format.
pub trait PragmaticPlan<W: Write> {
    /// Serializes plan in pragmatic json format.
    fn write_pragmatic_json(&self, world: &WorldState, writer: BufWriter<W>) -> Result<(), GenericError>;
}

impl<W: Write> PragmaticPlan<W> for DispatchPlan {
    fn write_pragmatic_json(&self, world: &WorldState, writer: BufWriter<W>) -> Result<(), GenericError> {
        let plan = create_plan(world, self);
        serialize_plan(writer, &plan).map_err(|err| err.to_string().into())
    }
}

/// Creates a plan in pragmatic format.
pub fn create_plan(world: &WorldState, plan: &DispatchPlan) -> ApiPlan {
    let rakes = plan
        .solution
        .compositions
        .iter()
        .enumerate()
        .map(|(idx, composition)| create_rake(world, idx, composition))
        .collect();

    let deferred = plan
        .solution
        .deferred
        .iter()
        .map(|deferral| DeferredOrder {
            order_id: world.orders[deferral.order].id.clone(),
            reason: deferral.reason.code().to_string(),
            violations: deferral.violations.iter().map(|kind| kind.code().to_string()).collect(),
        })
        .collect();

    let explanations =
        plan.explanation.orders.iter().map(|explanation| create_explanation(world, explanation)).collect();

    let front = plan
        .front
        .iter()
        .map(|member| FrontMember {
            objectives: create_objectives(&member.objectives),
            robustness: create_robustness(&member.robustness),
            deferred: member.deferred,
        })
        .collect();

    ApiPlan {
        cycle: plan.cycle,
        snapshot_version: plan.snapshot_version,
        method: format!("{:?}", plan.method).to_lowercase(),
        budget_exceeded: plan.budget_exceeded,
        objectives: create_objectives(&plan.objectives),
        robustness: create_robustness(&plan.robustness),
        kpis: create_kpis(&plan.kpis),
        rakes,
        deferred,
        explanations,
        chosen: plan.chosen,
        front,
        statistic: Statistic {
            duration: plan.metrics.duration,
            generations: plan.metrics.generations,
            evaluated: plan.metrics.evaluated,
            discarded: plan.metrics.discarded,
        },
    }
}

/// Returns stations of the route chain starting from its origin.
pub fn get_route_stations(world: &WorldState, route: usize) -> Vec<String> {
    let chain = world.route(route);

    std::iter::once(chain.origin.clone())
        .chain(chain.segments.iter().map(|&segment| world.network.segment(segment).destination.clone()))
        .collect()
}

fn get_rake_id(idx: usize) -> String {
    format!("rake-{}", idx + 1)
}

fn create_rake(world: &WorldState, idx: usize, composition: &RakeComposition) -> Rake {
    let wagons = composition
        .wagons()
        .into_iter()
        .map(|wagon| RakeWagon {
            wagon_id: world.wagons[wagon].id.clone(),
            loads: composition
                .assignments
                .iter()
                .filter(|assignment| assignment.wagon == wagon)
                .map(|assignment| WagonLoad {
                    order_id: world.orders[assignment.order].id.clone(),
                    load: assignment.load,
                })
                .collect(),
        })
        .collect();

    Rake {
        id: get_rake_id(idx),
        loading_point: world.loading_points[composition.loading_point].id.clone(),
        siding: composition.siding,
        route: get_route_stations(world, composition.route),
        orders: composition.orders.iter().map(|&order| world.orders[order].id.clone()).collect(),
        wagons,
        loading: Interval { start: format_time(composition.loading.start), end: format_time(composition.loading.end) },
        dispatch: format_time(composition.dispatch),
        arrival: format_time(composition.arrival),
        load: composition.total_load(),
        utilization: composition.utilization(world),
    }
}

fn create_explanation(world: &WorldState, explanation: &CoreOrderExplanation) -> OrderExplanation {
    let rake = match explanation.placement {
        OrderPlacement::Dispatched { composition } => Some(get_rake_id(composition)),
        OrderPlacement::Deferred { .. } => None,
    };

    let alternative = explanation.alternative.as_ref().map(|alternative| Alternative {
        target: match &alternative.target {
            AlternativeTarget::Composition(idx) => get_rake_id(*idx),
            AlternativeTarget::NewComposition { loading_point, route } => format!(
                "new rake at {} via {}",
                world.loading_points[*loading_point].id,
                get_route_stations(world, *route).join("-")
            ),
        },
        delta: create_objectives(&alternative.delta),
    });

    OrderExplanation {
        order_id: explanation.order_id.clone(),
        rake,
        constraints: explanation
            .constraints
            .iter()
            .map(|slack| ConstraintSlack { kind: slack.kind.code().to_string(), slack: slack.slack, binding: slack.binding })
            .collect(),
        marginal: explanation.marginal.as_ref().map(create_objectives),
        alternative,
        driver: explanation.driver.map(|term| term.to_string()),
        summary: explanation.summary.clone(),
    }
}

fn create_objectives(objectives: &ObjectiveVector) -> Objectives {
    Objectives {
        cost: objectives.cost,
        delay_penalty: objectives.delay_penalty,
        utilization: objectives.utilization,
        demurrage: objectives.demurrage,
    }
}

fn create_robustness(score: &ScenarioScore) -> Robustness {
    Robustness {
        expected: create_objectives(&score.expected),
        worst_case: create_objectives(&score.worst_case),
        on_time_probability: score.on_time_probability,
        expected_delay_hours: score.expected_delay_hours,
    }
}

fn create_kpis(kpis: &CoreKpis) -> Kpis {
    Kpis {
        cost_per_tonne_km: kpis.cost_per_tonne_km,
        on_time_ratio: kpis.on_time_ratio,
        expected_on_time_ratio: kpis.expected_on_time_ratio,
        average_utilization: kpis.average_utilization,
        demurrage_share: kpis.demurrage_share,
        dispatched_tonnage: kpis.dispatched_tonnage,
        deferred_tonnage: kpis.deferred_tonnage,
        rakes: kpis.rakes,
        wagons: kpis.wagons,
    }
}
