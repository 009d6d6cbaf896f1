use crate::format::plan::*;
use crate::helpers::*;

#[test]
fn can_split_order_across_wagons() {
    let snapshot = create_test_snapshot(vec![create_order("o1", 100.)], create_wagons(3, 60.));

    let plan = solve_with_check(snapshot, create_exact_policy());

    assert_eq!(plan.rakes.len(), 1);
    assert_eq!(
        plan.rakes[0].wagons,
        vec![
            RakeWagon { wagon_id: "w3".to_string(), loads: vec![WagonLoad { order_id: "o1".to_string(), load: 60. }] },
            RakeWagon { wagon_id: "w1".to_string(), loads: vec![WagonLoad { order_id: "o1".to_string(), load: 40. }] },
        ]
    );
    assert_eq!(plan.rakes[0].loading, Interval { start: at_hours(13.), end: at_hours(14.) });
}

#[test]
fn can_defer_non_splittable_order_exceeding_wagon_capacity() {
    let mut snapshot = create_test_snapshot(vec![create_order("o1", 100.)], create_wagons(3, 60.));
    snapshot.materials = vec![create_material(TEST_MATERIAL, false)];

    let plan = solve_with_check(snapshot, create_exact_policy());

    assert!(plan.rakes.is_empty());
    assert_eq!(
        plan.deferred,
        vec![DeferredOrder {
            order_id: "o1".to_string(),
            reason: "INFEASIBLE_SIZE".to_string(),
            violations: vec!["WAGON_CAPACITY".to_string()],
        }]
    );
}

#[test]
fn can_defer_order_exceeding_rake_length() {
    let snapshot = create_test_snapshot(vec![create_order("o1", 200.)], create_wagons(5, 60.));

    let plan = solve_with_check(snapshot, create_exact_policy().with_rake_length(1, 3));

    assert!(plan.rakes.is_empty());
    assert_eq!(plan.deferred[0].reason, "INFEASIBLE_SIZE");
    assert_eq!(plan.deferred[0].violations, vec!["WAGON_CAPACITY".to_string(), "RAKE_LENGTH".to_string()]);
}

parameterized_test! {can_share_wagon_between_orders_only_when_allowed, (wagon_sharing, expected_rakes, expected_deferred), {
    can_share_wagon_between_orders_only_when_allowed_impl(wagon_sharing, expected_rakes, expected_deferred);
}}

can_share_wagon_between_orders_only_when_allowed! {
    case01_sharing_allowed: (true, 1, 0),
    case02_sharing_disallowed: (false, 1, 1),
}

fn can_share_wagon_between_orders_only_when_allowed_impl(
    wagon_sharing: bool,
    expected_rakes: usize,
    expected_deferred: usize,
) {
    let snapshot = create_test_snapshot(vec![create_order("o1", 30.), create_order("o2", 20.)], create_wagons(1, 60.));

    let plan = solve_with_check(snapshot, create_exact_policy().with_wagon_sharing(wagon_sharing));

    assert_eq!(plan.rakes.len(), expected_rakes);
    assert_eq!(plan.deferred.len(), expected_deferred);
    assert_eq!(plan.kpis.wagons, 1);
}
