use super::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::solution::*;

#[test]
fn can_locate_orders_and_check_partition() {
    let world = create_test_world(vec![test_order("o1", 10.), test_order("o2", 20.), test_order("o3", 5.)], test_wagons(3, 25.));
    let policy = create_test_policy();

    let solution = create_test_solution(&world, &policy, vec![test_draft(vec![1, 0])], vec![2]);

    assert_eq!(solution.locate(0), Placement::Composition(0));
    assert_eq!(solution.locate(1), Placement::Composition(0));
    assert_eq!(solution.locate(2), Placement::Deferred);
    assert_eq!(solution.locate(3), Placement::Missing);
    assert!(solution.is_partition_of(3));
    assert!(!solution.is_partition_of(4));
    assert!(!solution.is_partition_of(2));
    assert_eq!(solution.deferred_orders(), vec![2]);
    assert_eq!(solution.order_sequence(&world), vec!["o2", "o1"]);
}

#[test]
fn can_detect_duplicated_order() {
    let world = create_test_world(vec![test_order("o1", 10.), test_order("o2", 20.)], test_wagons(3, 25.));
    let policy = create_test_policy();
    let mut solution = create_test_solution(&world, &policy, vec![test_draft(vec![0, 1])], vec![]);
    assert!(solution.is_partition_of(2));

    solution.deferred.push(Deferral { order: 1, reason: DeferralReason::CapacityExhausted, violations: Default::default() });

    assert!(!solution.is_partition_of(2));
}

#[test]
fn can_restore_drafts_and_key() {
    let world = create_test_world(vec![test_order("o1", 10.), test_order("o2", 20.)], test_wagons(2, 25.));
    let policy = create_test_policy();

    let solution = create_test_solution(&world, &policy, vec![test_draft(vec![0]), test_draft(vec![1])], vec![]);

    assert_eq!(solution.drafts(), vec![test_draft(vec![0]), test_draft(vec![1])]);
    assert_eq!(solution.key(), vec![(0, 0, 0, vec![0]), (0, 0, 0, vec![1])]);
}

#[test]
fn can_get_objective_terms_and_delta() {
    let first = ObjectiveVector { cost: 10., delay_penalty: 2., utilization: 0.5, demurrage: 1. };
    let second = ObjectiveVector { cost: 4., delay_penalty: 2., utilization: 0.75, demurrage: 0. };

    let delta = first.delta(&second);

    assert_eq!(delta, ObjectiveVector { cost: 6., delay_penalty: 0., utilization: -0.25, demurrage: 1. });
    assert_eq!(ObjectiveTerm::ALL.map(|term| first.get(term)), [10., 2., 0.5, 1.]);
    assert_eq!(ObjectiveTerm::ALL.iter().filter(|term| term.is_maximized()).count(), 1);
    assert_eq!(ObjectiveTerm::Demurrage.to_string(), "demurrage");
}
