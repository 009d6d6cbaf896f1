use super::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::solution::*;
use crate::models::common::DAY;

fn assert_close(actual: Float, expected: Float) {
    assert!((actual - expected).abs() < 1E-6, "expected {expected}, got {actual}");
}

#[test]
fn can_evaluate_single_composition() {
    let world = create_test_world(vec![test_order("o1", 10.)], test_wagons(2, 25.));
    let policy = create_test_policy();

    let candidate = create_test_candidate(&world, &policy, vec![test_draft(vec![0])], vec![]);

    assert_eq!(candidate.objectives, ObjectiveVector { cost: 6000., delay_penalty: 0., utilization: 0.4, demurrage: 0. });
}

#[test]
fn can_average_utilization_over_wagons() {
    let world = create_test_world(vec![test_order("o1", 10.), test_order("o2", 20.)], test_wagons(2, 25.));
    let policy = create_test_policy();

    let candidate = create_test_candidate(&world, &policy, vec![test_draft(vec![0, 1])], vec![]);

    assert_close(candidate.objectives.utilization, 0.6);
    assert_close(candidate.objectives.cost, 500. * 30. + 1000.);
}

#[test]
fn can_evaluate_empty_solution() {
    let world = create_test_world(vec![test_order("o1", 10.)], test_wagons(2, 25.));
    let policy = create_test_policy();

    let candidate = create_test_candidate(&world, &policy, vec![], vec![0]);

    assert_eq!(candidate.objectives, ObjectiveVector::default());
    assert_eq!(candidate.deferred_count(), 1);
}

#[test]
fn can_charge_delay_penalty_for_tolerated_late_arrival() {
    let world = create_test_world(vec![OrderBuilder::new("o1", 10.).window(0., DAY / 2.).build()], test_wagons(1, 25.));
    let policy = create_test_policy().with_soft_deadline_tiers(vec![1]);

    let candidate = create_test_candidate(&world, &policy, vec![test_draft(vec![0])], vec![]);

    // arrival is at 0.1h of loading plus 24h of transit
    assert_close(delay_hours(&candidate.solution.compositions[0], &world), 12.1);
    assert_close(candidate.objectives.delay_penalty, 12.1 * 500.);
}

#[test]
fn can_charge_demurrage_above_free_time() {
    let mut point = test_loading_point("lp1");
    point.throughput = 1.;
    let world = WorldBuilder::default()
        .orders(vec![test_order("o1", 10.)])
        .wagons(test_wagons(1, 25.))
        .loading_points(vec![point])
        .build();
    let policy = create_test_policy();

    let candidate = create_test_candidate(&world, &policy, vec![test_draft(vec![0])], vec![]);

    assert_close(demurrage_hours(&candidate.solution.compositions[0], &world), 6.);
    assert_close(candidate.objectives.demurrage, 6. * 150.);
}

parameterized_test! {can_order_candidates, (first, second, expected), {
    can_order_candidates_impl(first, second, expected);
}}

can_order_candidates! {
    case01_fewer_deferred_wins: (((900., 0., 0.1, 0.), 0), ((1., 0., 0.9, 0.), 1), Ordering::Less),
    case02_cheaper_dominates: (((100., 0., 0.5, 0.), 0), ((200., 0., 0.5, 0.), 0), Ordering::Less),
    case03_higher_utilization_dominates: (((100., 0., 0.4, 0.), 0), ((100., 0., 0.5, 0.), 0), Ordering::Greater),
    case04_trade_off: (((100., 0., 0.4, 0.), 0), ((200., 0., 0.5, 0.), 0), Ordering::Equal),
    case05_same: (((100., 1., 0.4, 2.), 1), ((100., 1., 0.4, 2.), 1), Ordering::Equal),
}

fn can_order_candidates_impl(
    first: ((Float, Float, Float, Float), usize),
    second: ((Float, Float, Float, Float), usize),
    expected: Ordering,
) {
    let first = test_candidate_with_objectives(first.0, first.1);
    let second = test_candidate_with_objectives(second.0, second.1);

    assert_eq!(RakeMultiObjective::default().total_order(&first, &second), expected);
}

#[test]
fn can_select_unique_non_dominated_candidates() {
    let world = create_test_world(vec![test_order("o1", 10.), test_order("o2", 20.)], test_wagons(2, 25.));
    let policy = create_test_policy();
    let grouped = create_test_candidate(&world, &policy, vec![test_draft(vec![0, 1])], vec![]);
    let separate = create_test_candidate(&world, &policy, vec![test_draft(vec![0]), test_draft(vec![1])], vec![]);
    let partial = create_test_candidate(&world, &policy, vec![test_draft(vec![0])], vec![1]);

    let front = select_front(vec![separate, grouped.clone(), partial, grouped]);

    assert_eq!(front.len(), 1);
    assert_eq!(front[0].solution.key(), vec![(0, 0, 0, vec![0, 1])]);
}

#[test]
fn can_dedup_structurally_equal_candidates() {
    let first = test_candidate_with_objectives((1., 0., 0., 0.), 1);
    let second = test_candidate_with_objectives((2., 0., 0., 0.), 1);
    let third = test_candidate_with_objectives((2., 0., 0., 0.), 2);

    let unique = dedup_candidates(vec![first, second, third]);

    assert_eq!(unique.len(), 2);
    assert_eq!(unique[0].objectives.cost, 1.);
    assert_eq!(unique[1].deferred_count(), 2);
}
