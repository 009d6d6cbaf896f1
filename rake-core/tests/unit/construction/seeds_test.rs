use super::*;
use crate::helpers::models::problem::*;
use crate::helpers::utils::random::FakeRandom;
use crate::models::PlanningPolicy;
use crate::models::common::DAY;
use crate::models::problem::{Order, WorldState};

fn get_groups(solution: &Solution) -> Vec<Vec<usize>> {
    solution.compositions.iter().map(|composition| composition.orders.clone()).collect()
}

fn create_greedy(world: &WorldState, policy: &PlanningPolicy) -> Solution {
    create_greedy_seed(&Decoder::new(world, policy))
}

#[test]
fn can_dispatch_largest_order_first_when_wagons_are_scarce() {
    let world = create_test_world(
        vec![test_order("o1", 10.), test_order("o2", 15.), test_order("o3", 40.)],
        test_wagons(2, 25.),
    );
    let policy = create_test_policy().with_rake_length(1, 2);

    let solution = create_greedy(&world, &policy);

    assert_eq!(get_groups(&solution), vec![vec![2]]);
    assert_eq!(solution.deferred_orders(), vec![0, 1]);
    assert!(solution.deferred.iter().all(|deferral| deferral.reason == DeferralReason::CapacityExhausted));
    assert!(solution.is_partition_of(3));
}

parameterized_test! {can_group_orders_of_same_lane, (quantities, wagon_sharing, expected), {
    can_group_orders_of_same_lane_impl(quantities, wagon_sharing, expected);
}}

can_group_orders_of_same_lane! {
    case01_separate_wagons: (vec![10., 10.], false, vec![vec![0, 1]]),
    case02_shared_wagon: (vec![10., 10.], true, vec![vec![0, 1]]),
    case03_utilization_drop: (vec![24., 5.], false, vec![vec![0], vec![1]]),
}

fn can_group_orders_of_same_lane_impl(quantities: Vec<Float>, wagon_sharing: bool, expected: Vec<Vec<usize>>) {
    let orders = quantities.iter().enumerate().map(|(idx, &quantity)| test_order(&format!("o{idx}"), quantity)).collect();
    let world = create_test_world(orders, test_wagons(4, 25.));
    let policy = create_test_policy().with_wagon_sharing(wagon_sharing);

    let solution = create_greedy(&world, &policy);

    assert_eq!(get_groups(&solution), expected);
    assert!(solution.deferred.is_empty());
}

#[test]
fn can_grow_composition_up_to_minimum_rake_length() {
    let world = create_test_world(vec![test_order("o1", 10.), test_order("o2", 10.)], test_wagons(4, 25.));
    let policy = create_test_policy().with_rake_length(2, 4);

    let solution = create_greedy(&world, &policy);

    assert_eq!(get_groups(&solution), vec![vec![0, 1]]);
    assert_eq!(solution.compositions[0].wagons().len(), 2);
}

#[test]
fn can_keep_lanes_apart() {
    let world = WorldBuilder::default()
        .orders(vec![test_order("o1", 10.), OrderBuilder::new("o2", 10.).destination("port").build()])
        .wagons(test_wagons(2, 25.))
        .segments(vec![
            test_segment(TEST_PLANT, TEST_DESTINATION, TEST_DISTANCE, TEST_TRANSIT),
            test_segment(TEST_PLANT, "port", 100., TEST_TRANSIT),
        ])
        .build();
    let policy = create_test_policy();

    let solution = create_greedy(&world, &policy);

    assert_eq!(get_groups(&solution), vec![vec![0], vec![1]]);
}

fn create_ordering_world() -> WorldState {
    create_test_world(
        vec![
            OrderBuilder::new("o1", 10.).priority(1).window(0., 5. * DAY).build(),
            OrderBuilder::new("o2", 30.).priority(3).window(0., 8. * DAY).build(),
            OrderBuilder::new("o3", 20.).priority(1).window(0., 2. * DAY).build(),
            OrderBuilder::new("o4", 40.).priority(1).window(0., 5. * DAY).build(),
        ],
        test_wagons(4, 25.),
    )
}

parameterized_test! {can_sort_orders, (ordering, expected), {
    can_sort_orders_impl(ordering, expected);
}}

can_sort_orders! {
    case01_priority: (SeedOrdering::Priority, vec![1, 2, 3, 0]),
    case02_due_date: (SeedOrdering::DueDateFirst, vec![2, 0, 3, 1]),
    case03_quantity: (SeedOrdering::QuantityFirst, vec![3, 1, 2, 0]),
    case04_cost: (SeedOrdering::CostFirst, vec![1, 2, 3, 0]),
}

fn can_sort_orders_impl(ordering: SeedOrdering, expected: Vec<usize>) {
    let world = create_ordering_world();
    let policy = create_test_policy();

    let orders = sort_orders(&Decoder::new(&world, &policy), ordering, None);

    assert_eq!(orders, expected);
}

#[test]
fn can_shuffle_orders_with_random() {
    let world = create_ordering_world();
    let policy = create_test_policy();
    let random = FakeRandom::new(vec![0, 0, 0], vec![]);
    let random: &(dyn Random + Send + Sync) = &random;

    let orders = sort_orders(&Decoder::new(&world, &policy), SeedOrdering::Shuffled, Some(random));

    assert_eq!(orders, vec![1, 2, 3, 0]);
}

#[test]
fn can_create_distinct_seeds_starting_with_greedy() {
    let world = create_ordering_world();
    let policy = create_test_policy().with_rake_length(1, 2);
    let decoder = Decoder::new(&world, &policy);

    let seeds = create_seeds(&decoder, 5, None);

    assert!(!seeds.is_empty() && seeds.len() <= 4);
    assert_eq!(seeds[0], create_greedy_seed(&decoder));
    seeds.iter().for_each(|seed| assert!(seed.is_partition_of(4)));
    seeds.iter().enumerate().for_each(|(idx, seed)| {
        assert!(seeds[idx + 1..].iter().all(|other| other.key() != seed.key() || other.deferred_orders() != seed.deferred_orders()));
    });
}

#[test]
fn can_limit_amount_of_seeds() {
    let world = create_ordering_world();
    let policy = create_test_policy();
    let decoder = Decoder::new(&world, &policy);

    assert_eq!(create_seeds(&decoder, 1, None).len(), 1);
    assert_eq!(create_seeds(&decoder, 0, None).len(), 1);
}

#[test]
fn can_handle_empty_backlog() {
    let world = create_test_world(vec![], test_wagons(2, 25.));
    let policy = create_test_policy();

    let solution = create_greedy(&world, &policy);

    assert_eq!(solution, Solution::default());
}
