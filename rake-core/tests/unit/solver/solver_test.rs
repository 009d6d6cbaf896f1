use super::*;
use crate::helpers::models::problem::*;
use crate::helpers::utils::create_test_environment;
use crate::models::common::DAY;
use crate::models::problem::Order;
use crate::models::solution::{DeferralReason, Placement};
use crate::selection::OrderPlacement;
use crate::utils::Float;

fn create_solver(orders: Vec<Order>, wagon_count: usize, policy: PlanningPolicy) -> Solver {
    let world = create_test_world(orders, test_wagons(wagon_count, 25.));
    Solver::new(Arc::new(world), Arc::new(policy), create_test_environment())
}

parameterized_test! {can_resolve_solve_method, (method, exact_threshold, expected), {
    let mut policy = create_test_policy().with_method(method);
    policy.exact_threshold = exact_threshold;
    let solver = create_solver(vec![test_order("o1", 10.), test_order("o2", 10.)], 3, policy);

    assert_eq!(solver.resolve_method(), expected);
}}

can_resolve_solve_method! {
    case01_auto_small: (SolveMethod::Auto, 6, SolveMethod::Exact),
    case02_auto_large: (SolveMethod::Auto, 5, SolveMethod::Heuristic),
    case03_explicit_greedy: (SolveMethod::Greedy, 64, SolveMethod::Greedy),
    case04_explicit_heuristic: (SolveMethod::Heuristic, 64, SolveMethod::Heuristic),
}

#[test]
fn can_solve_scarce_instance() {
    let orders = vec![test_order("o1", 10.), test_order("o2", 15.), test_order("o3", 40.)];
    let solver = create_solver(orders, 2, create_test_policy().with_rake_length(1, 2)).with_cycle(3);

    let plan = solver.solve().unwrap();

    assert_eq!(plan.cycle, 3);
    assert_eq!(plan.method, SolveMethod::Exact);
    assert!(!plan.budget_exceeded);
    assert!(plan.chosen < plan.front.len());
    assert!(plan.front.iter().all(|member| member.deferred == 1));
    assert_eq!(plan.solution.locate(0), Placement::Composition(0));
    assert_eq!(plan.solution.locate(1), Placement::Composition(0));
    assert_eq!(plan.solution.locate(2), Placement::Deferred);
    assert_eq!(plan.objectives.cost, 13500.);
    assert_eq!(plan.kpis.rakes, 1);
    assert_eq!(plan.kpis.deferred_tonnage, 40.);
    assert_eq!(plan.explanation.orders.len(), 3);
    assert_eq!(plan.explanation.orders[2].summary, "order o3 is deferred: CAPACITY_EXHAUSTED (WAGON_AVAILABILITY)");
}

#[test]
fn can_dispatch_late_order_of_soft_tier() {
    let order = OrderBuilder::new("o1", 10.).window(0., DAY / 2.).build();
    let solver = create_solver(vec![order], 1, create_test_policy().with_soft_deadline_tiers(vec![1]));

    let plan = solver.solve().unwrap();

    assert!(plan.solution.deferred.is_empty());
    assert!((plan.objectives.delay_penalty - 12.1 * 500.).abs() < 1E-6);
    assert_eq!(plan.kpis.on_time_ratio, 0.);
}

#[test]
fn can_defer_late_order_with_hard_deadline() {
    let order = OrderBuilder::new("o1", 10.).window(0., DAY / 2.).hard_deadline().build();
    let solver = create_solver(vec![order], 1, create_test_policy().with_soft_deadline_tiers(vec![1]));

    let plan = solver.solve().unwrap();

    assert!(plan.solution.compositions.is_empty());
    assert_eq!(plan.solution.deferred[0].reason, DeferralReason::WindowMissed);
    assert!(matches!(
        &plan.explanation.orders[0].placement,
        OrderPlacement::Deferred { reason: DeferralReason::WindowMissed, .. }
    ));
    assert_eq!(plan.explanation.orders[0].summary, "order o1 is deferred: WINDOW_MISSED (DELIVERY_WINDOW)");
}

#[test]
fn can_solve_empty_backlog() {
    let solver = create_solver(vec![], 2, create_test_policy());

    let plan = solver.solve().unwrap();

    assert!(plan.solution.compositions.is_empty());
    assert!(plan.solution.deferred.is_empty());
    assert!(plan.explanation.orders.is_empty());
    assert_eq!(plan.front.len(), 1);
}

#[test]
fn can_reject_invalid_policy() {
    let solver = create_solver(vec![test_order("o1", 10.)], 1, create_test_policy().with_rake_length(3, 2));

    assert!(solver.solve().is_err());
}

#[test]
fn can_produce_partition_and_same_plan_with_heuristic() {
    let create_orders = || (1..=6).map(|idx| test_order(&format!("o{idx}"), 5. * idx as Float)).collect::<Vec<_>>();
    let policy = create_test_policy().with_method(SolveMethod::Heuristic).with_rake_length(1, 3);

    let first = create_solver(create_orders(), 6, policy.clone()).solve().unwrap();
    let second = create_solver(create_orders(), 6, policy).solve().unwrap();

    assert_eq!(first.method, SolveMethod::Heuristic);
    assert!(first.solution.is_partition_of(6));
    assert_eq!(first.solution.key(), second.solution.key());
    assert_eq!(first.objectives, second.objectives);
    assert_eq!(first.explanation, second.explanation);
}
