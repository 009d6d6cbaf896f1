#[cfg(test)]
#[path = "../../tests/unit/selection/explainer_test.rs"]
mod explainer_test;

use crate::construction::constraints::{ConstraintKind, EPSILON, slice_index, slice_usage, slice_window};
use crate::construction::decoder::Decoder;
use crate::models::PlanningPolicy;
use crate::models::common::HOUR;
use crate::models::problem::WorldState;
use crate::models::solution::*;
use crate::solver::objectives::evaluate;
use crate::utils::{Float, compare_floats};

/// Normalized slack at or below which a constraint is reported as binding.
pub const BINDING_THRESHOLD: Float = 0.05;

/// A normalized slack of a hard constraint for a dispatched order.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintSlack {
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Slack relative to the constraint limit, negative means tolerated violation (late arrival).
    pub slack: Float,
    /// True if the constraint is binding.
    pub binding: bool,
}

/// A target of the nearest alternative placement.
#[derive(Clone, Debug, PartialEq)]
pub enum AlternativeTarget {
    /// Another composition of the solution.
    Composition(usize),
    /// A new composition with the given loading point and route indices.
    NewComposition {
        /// Loading point index.
        loading_point: usize,
        /// Route index.
        route: usize,
    },
}

/// The nearest feasible alternative placement of an order.
#[derive(Clone, Debug, PartialEq)]
pub struct Alternative {
    /// Where the order would go.
    pub target: AlternativeTarget,
    /// Objective change compared to the chosen solution.
    pub delta: ObjectiveVector,
}

/// Where the order ended up.
#[derive(Clone, Debug, PartialEq)]
pub enum OrderPlacement {
    /// The order is dispatched with the composition.
    Dispatched {
        /// Composition index.
        composition: usize,
    },
    /// The order is deferred.
    Deferred {
        /// Deferral reason.
        reason: DeferralReason,
        /// Violated constraints.
        violations: Vec<ConstraintKind>,
    },
}

/// Explains placement of a single order.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderExplanation {
    /// Order id.
    pub order_id: String,
    /// Placement.
    pub placement: OrderPlacement,
    /// Constraint slacks sorted from the tightest one.
    pub constraints: Vec<ConstraintSlack>,
    /// Objective change caused by the order: objectives with it minus objectives without it.
    pub marginal: Option<ObjectiveVector>,
    /// The nearest feasible alternative placement.
    pub alternative: Option<Alternative>,
    /// The objective term which most drove the placement.
    pub driver: Option<ObjectiveTerm>,
    /// A human readable summary.
    pub summary: String,
}

/// An explanation trace of a solution: one entry per order in snapshot order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Explanation {
    /// Order explanations.
    pub orders: Vec<OrderExplanation>,
}

/// Explains every order of the candidate. The result depends only on its inputs.
pub fn explain(candidate: &Candidate, world: &WorldState, policy: &PlanningPolicy) -> Explanation {
    let decoder = Decoder::new(world, policy);
    let solution = candidate.solution.as_ref();

    let orders = (0..world.orders.len())
        .map(|order| match solution.locate(order) {
            Placement::Composition(composition) => explain_dispatched(&decoder, candidate, order, composition),
            Placement::Deferred | Placement::Missing => explain_deferred(world, solution, order),
        })
        .collect();

    Explanation { orders }
}

fn explain_deferred(world: &WorldState, solution: &Solution, order: usize) -> OrderExplanation {
    let order_id = world.orders[order].id.clone();
    let (reason, violations) = solution
        .deferred
        .iter()
        .find(|deferral| deferral.order == order)
        .map_or((DeferralReason::CapacityExhausted, vec![]), |deferral| {
            (deferral.reason, deferral.violations.iter().copied().collect::<Vec<_>>())
        });

    let codes = violations.iter().map(|kind| kind.code()).collect::<Vec<_>>();
    let summary = if codes.is_empty() {
        format!("order {order_id} is deferred: {reason}")
    } else {
        format!("order {order_id} is deferred: {reason} ({})", codes.join(", "))
    };

    OrderExplanation {
        order_id,
        placement: OrderPlacement::Deferred { reason, violations },
        constraints: vec![],
        marginal: None,
        alternative: None,
        driver: None,
        summary,
    }
}

fn explain_dispatched(
    decoder: &Decoder,
    candidate: &Candidate,
    order: usize,
    composition_idx: usize,
) -> OrderExplanation {
    let world = decoder.world();
    let policy = decoder.policy();
    let solution = candidate.solution.as_ref();
    let composition = &solution.compositions[composition_idx];

    let constraints = constraint_slacks(decoder, solution, composition, order);
    let marginal = marginal_contribution(decoder, candidate, order, composition_idx);
    let alternative = nearest_alternative(decoder, candidate, order, composition_idx);
    let driver = dominant_term(&marginal, &candidate.objectives, policy);

    let order_ref = &world.orders[order];
    let late_hours = (composition.arrival - order_ref.window.end).max(0.) / HOUR;
    let arrival = if late_hours > EPSILON { format!("{late_hours:.1}h late") } else { "on time".to_string() };
    let binding = constraints.iter().filter(|slack| slack.binding).map(|slack| slack.kind.code()).collect::<Vec<_>>();
    let wagons = composition.assignments.iter().filter(|assignment| assignment.order == order).count();

    let summary = format!(
        "order {} is loaded on rake {} at {} (siding {}) on {} wagon(s), arriving {}; binding: {}; main driver: {}",
        order_ref.id,
        composition_idx + 1,
        world.loading_points[composition.loading_point].id,
        composition.siding,
        wagons,
        arrival,
        if binding.is_empty() { "none".to_string() } else { binding.join(", ") },
        driver.map_or("none".to_string(), |term| term.to_string()),
    );

    OrderExplanation {
        order_id: order_ref.id.clone(),
        placement: OrderPlacement::Dispatched { composition: composition_idx },
        constraints,
        marginal: Some(marginal),
        alternative,
        driver,
        summary,
    }
}

fn constraint_slacks(
    decoder: &Decoder,
    solution: &Solution,
    composition: &RakeComposition,
    order: usize,
) -> Vec<ConstraintSlack> {
    let world = decoder.world();
    let policy = decoder.policy();
    let order_ref = &world.orders[order];
    let mut slacks = Vec::new();

    let capacity_slack = composition
        .wagon_loads()
        .into_iter()
        .filter(|(wagon, _)| {
            composition.assignments.iter().any(|assignment| assignment.wagon == *wagon && assignment.order == order)
        })
        .map(|(wagon, load)| {
            let capacity = world.wagons[wagon].capacity;
            (capacity - load) / capacity
        })
        .fold(Float::MAX, Float::min);
    if capacity_slack < Float::MAX {
        slacks.push((ConstraintKind::WagonCapacity, capacity_slack));
    }

    let max_length = policy.rake_length.max as Float;
    slacks.push((ConstraintKind::RakeLength, (max_length - composition.wagons().len() as Float) / max_length));

    let window_scale = order_ref.window.duration().max(HOUR);
    slacks.push((ConstraintKind::DeliveryWindow, (order_ref.window.end - composition.arrival) / window_scale));

    let point = &world.loading_points[composition.loading_point];
    let occupancy = decoder.occupancy(solution);
    let slice_idx = slice_index(composition.loading.start, world.start, policy.slice_length);
    let slice = slice_window(slice_idx, world.start, policy.slice_length);
    let usage = slice_usage(point, occupancy.bookings(composition.loading_point), &slice);
    let throughput_slack = (point.slice_capacity - usage) / point.slice_capacity.max(EPSILON);
    slacks.push((ConstraintKind::LoadingThroughput, throughput_slack));

    let gross_weight = composition.gross_weight(world);
    let weight_slack = world
        .route(composition.route)
        .segments
        .iter()
        .filter_map(|&segment| world.network.segment(segment).restriction.max_gross_weight)
        .map(|limit| (limit - gross_weight) / limit)
        .fold(Float::MAX, Float::min);
    if weight_slack < Float::MAX {
        slacks.push((ConstraintKind::RouteRestriction, weight_slack));
    }

    let mut slacks = slacks
        .into_iter()
        .map(|(kind, slack)| ConstraintSlack { kind, slack, binding: slack <= BINDING_THRESHOLD })
        .collect::<Vec<_>>();
    slacks.sort_by(|a, b| compare_floats(a.slack, b.slack).then_with(|| a.kind.cmp(&b.kind)));

    slacks
}

fn marginal_contribution(
    decoder: &Decoder,
    candidate: &Candidate,
    order: usize,
    composition_idx: usize,
) -> ObjectiveVector {
    let world = decoder.world();
    let policy = decoder.policy();
    let solution = candidate.solution.as_ref();

    let mut drafts = solution.drafts();
    drafts.iter_mut().for_each(|draft| draft.orders.retain(|&other| other != order));

    let mut deferred = solution.deferred_orders();
    deferred.push(order);

    // a reduced composition can become infeasible (e.g. below minimum rake length): the order then
    // accounts for the whole composition
    let without = match decoder.decode(&drafts, &deferred) {
        Ok(without) => without,
        Err(_) => Solution {
            compositions: solution
                .compositions
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != composition_idx)
                .map(|(_, composition)| composition.clone())
                .collect(),
            deferred: solution.deferred.clone(),
        },
    };
    let without = evaluate(&without, world, policy);

    candidate.objectives.delta(&without)
}

fn nearest_alternative(decoder: &Decoder, candidate: &Candidate, order: usize, current: usize) -> Option<Alternative> {
    let world = decoder.world();
    let policy = decoder.policy();
    let solution = candidate.solution.as_ref();
    let order_ref = &world.orders[order];

    let mut base = solution.drafts();
    base[current].orders.retain(|&other| other != order);

    let existing = (0..base.len()).filter(|&idx| idx != current).filter(|&idx| {
        let draft = &base[idx];
        world.loading_points[draft.loading_point].plant == order_ref.plant
            && world.route(draft.route).destination == order_ref.destination
    });

    let existing = existing
        .map(|idx| {
            let mut drafts = base.clone();
            drafts[idx].orders.push(order);
            (AlternativeTarget::Composition(idx), drafts)
        })
        .collect::<Vec<_>>();

    let new_ones = world.options(order, policy.route_alternatives).into_iter().filter_map(|(loading_point, route)| {
        let current_draft = &solution.compositions[current];
        let is_same = current_draft.orders.len() == 1
            && current_draft.loading_point == loading_point
            && current_draft.route == route;

        (!is_same).then(|| {
            let mut drafts = base.clone();
            drafts.push(RakeDraft { loading_point, route, orders: vec![order] });
            (AlternativeTarget::NewComposition { loading_point, route }, drafts)
        })
    });

    let deferred = solution.deferred_orders();

    existing
        .into_iter()
        .chain(new_ones)
        .filter_map(|(target, drafts)| {
            let alternative = decoder.decode(&drafts, &deferred).ok()?;
            let objectives = evaluate(&alternative, world, policy);
            let delta = objectives.delta(&candidate.objectives);
            let distance = weighted_distance(&delta, &candidate.objectives, policy);

            Some((distance, Alternative { target, delta }))
        })
        .min_by(|(a, _), (b, _)| compare_floats(*a, *b))
        .map(|(_, alternative)| alternative)
}

fn relative(value: Float, reference: Float) -> Float {
    value.abs() / reference.abs().max(EPSILON)
}

fn weighted_distance(delta: &ObjectiveVector, reference: &ObjectiveVector, policy: &PlanningPolicy) -> Float {
    ObjectiveTerm::ALL
        .iter()
        .map(|&term| policy.weights.get(term) * relative(delta.get(term), reference.get(term).abs().max(1.)))
        .sum()
}

fn dominant_term(
    marginal: &ObjectiveVector,
    objectives: &ObjectiveVector,
    policy: &PlanningPolicy,
) -> Option<ObjectiveTerm> {
    ObjectiveTerm::ALL
        .iter()
        .map(|&term| {
            let scale = objectives.get(term).abs().max(1.);
            (term, policy.weights.get(term) * relative(marginal.get(term), scale))
        })
        .filter(|(_, contribution)| *contribution > EPSILON)
        .max_by(|(_, a), (_, b)| compare_floats(*a, *b))
        .map(|(term, _)| term)
}
