use super::*;
use crate::algorithms::nsga2::MultiObjective;
use crate::construction::constraints::ViolationSet;
use crate::construction::seeds::create_seeds;
use crate::helpers::models::problem::*;
use crate::helpers::utils::create_test_environment;
use crate::models::PlanningPolicy;
use crate::models::common::DAY;
use crate::models::problem::WorldState;
use crate::models::solution::DeferralReason;
use crate::solver::objectives::RakeMultiObjective;
use crate::solver::telemetry::TelemetryMode;
use std::cmp::Ordering;

fn run_exact(world: &WorldState, policy: &PlanningPolicy) -> Result<SearchOutcome, PlanningError> {
    let decoder = Decoder::new(world, policy);
    let environment = create_test_environment();
    let seeds = create_seeds(&decoder, policy.evolution.seeds, None)
        .into_iter()
        .map(|solution| create_candidate(solution, world, policy))
        .collect();

    solve_exact(&decoder, environment.as_ref(), seeds, &mut Telemetry::new(TelemetryMode::None))
}

fn create_scarce_world() -> WorldState {
    create_test_world(vec![test_order("o1", 10.), test_order("o2", 15.), test_order("o3", 40.)], test_wagons(2, 25.))
}

#[test]
fn can_find_solution_dispatching_most_orders() {
    let world = create_scarce_world();
    let policy = create_test_policy().with_rake_length(1, 2);

    let outcome = run_exact(&world, &policy).unwrap();

    assert!(!outcome.budget_exceeded);
    assert!(!outcome.front.is_empty());
    outcome.front.iter().for_each(|candidate| {
        assert_eq!(candidate.solution.compositions.len(), 1);
        let mut orders = candidate.solution.compositions[0].orders.clone();
        orders.sort_unstable();
        assert_eq!(orders, vec![0, 1]);
        assert_eq!(candidate.objectives.cost, 500. * 25. + 1000.);
        assert!((candidate.objectives.utilization - 0.5).abs() < 1E-9);

        let deferred = &candidate.solution.deferred;
        assert_eq!(deferred.len(), 1);
        assert_eq!(deferred[0].order, 2);
        assert_eq!(deferred[0].reason, DeferralReason::CapacityExhausted);
        assert_eq!(deferred[0].violations, ViolationSet::from([ConstraintKind::WagonAvailability]));
    });
}

#[test]
fn can_return_mutually_non_dominated_partitions() {
    let world = create_test_world(
        vec![
            test_order("o1", 10.),
            test_order("o2", 20.),
            test_order("o3", 25.),
            OrderBuilder::new("o4", 5.).window(0., 2. * DAY).build(),
        ],
        test_wagons(4, 25.),
    );
    let policy = create_test_policy();
    let objective = RakeMultiObjective::default();

    let outcome = run_exact(&world, &policy).unwrap();

    assert!(!outcome.front.is_empty());
    outcome.front.iter().for_each(|candidate| {
        assert!(candidate.solution.is_partition_of(4));
        assert!(candidate.solution.deferred.is_empty());
    });
    outcome.front.iter().enumerate().for_each(|(idx, a)| {
        outcome.front.iter().skip(idx + 1).for_each(|b| assert_eq!(objective.total_order(a, b), Ordering::Equal));
    });
}

#[test]
fn can_handle_empty_backlog() {
    let world = create_test_world(vec![], test_wagons(2, 25.));
    let policy = create_test_policy();

    let outcome = run_exact(&world, &policy).unwrap();

    assert_eq!(outcome.front.len(), 1);
    assert!(outcome.front[0].solution.compositions.is_empty());
}

parameterized_test! {can_handle_instance_without_dispatchable_orders, (require_dispatch, is_error), {
    can_handle_instance_without_dispatchable_orders_impl(require_dispatch, is_error);
}}

can_handle_instance_without_dispatchable_orders! {
    case01_report_error: (true, true),
    case02_defer_all: (false, false),
}

fn can_handle_instance_without_dispatchable_orders_impl(require_dispatch: bool, is_error: bool) {
    let world = WorldBuilder::default()
        .orders(vec![test_order("o1", 40.)])
        .wagons(test_wagons(2, 25.))
        .materials(vec![test_material(TEST_MATERIAL, false)])
        .build();
    let mut policy = create_test_policy();
    policy.require_dispatch = require_dispatch;

    let result = run_exact(&world, &policy);

    if is_error {
        let Err(PlanningError::InfeasibleInstance(orders)) = result else { unreachable!("expected infeasible instance") };
        assert_eq!(
            orders,
            vec![UnsatisfiableOrder { order_id: "o1".to_string(), constraints: vec![ConstraintKind::WagonCapacity] }]
        );
    } else {
        let outcome = result.unwrap();
        assert_eq!(outcome.front.len(), 1);
        assert_eq!(outcome.front[0].solution.deferred[0].reason, DeferralReason::InfeasibleSize);
    }
}

#[test]
fn can_stop_on_node_limit() {
    let world = create_scarce_world();
    let mut policy = create_test_policy().with_rake_length(1, 2);
    policy.exact_node_limit = 1;

    let outcome = run_exact(&world, &policy).unwrap();

    assert!(outcome.budget_exceeded);
    assert!(!outcome.front.is_empty());
    assert!(outcome.front.iter().all(|candidate| candidate.solution.is_partition_of(3)));
}

#[test]
fn can_stop_on_time_limit() {
    let orders = (0..8).map(|idx| test_order(&format!("o{idx}"), 10.)).collect();
    let world = create_test_world(orders, test_wagons(8, 25.));
    let mut policy = create_test_policy().with_rake_length(1, 8);
    policy.evolution.max_time = Some(0.);

    let outcome = run_exact(&world, &policy).unwrap();

    assert!(outcome.budget_exceeded);
    assert!(!outcome.front.is_empty());
    assert!(outcome.front.iter().all(|candidate| candidate.solution.is_partition_of(8)));
}
