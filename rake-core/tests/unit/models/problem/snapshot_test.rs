use super::*;
use crate::helpers::models::problem::*;
use crate::models::common::{HOUR, TimeWindow};

#[test]
fn can_create_snapshot_with_lanes_and_options() {
    let mut second_point = test_loading_point("lp2");
    second_point.mode = HandlingMode::Manual;
    let world = WorldBuilder::default()
        .orders(vec![test_order("o1", 10.)])
        .wagons(test_wagons(2, 25.))
        .loading_points(vec![test_loading_point("lp1"), second_point])
        .segments(vec![
            test_segment(TEST_PLANT, TEST_DESTINATION, TEST_DISTANCE, TEST_TRANSIT),
            test_segment(TEST_PLANT, "junction", 100., HOUR),
            test_segment("junction", TEST_DESTINATION, 450., 30. * HOUR),
        ])
        .build();

    assert_eq!(world.version, 0);
    assert_eq!(world.route_count(), 2);
    assert_eq!(world.lanes(TEST_PLANT, TEST_DESTINATION), &[0, 1]);
    assert_eq!(world.route(0).segments, vec![0]);
    assert_eq!(world.route(1).segments, vec![1, 2]);
    assert_eq!(world.loading_points_at(TEST_PLANT), &[0, 1]);
    assert_eq!(world.options(0, 1), vec![(0, 0), (1, 0)]);
    assert_eq!(world.options(0, 5), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    assert_eq!(world.order_index("o1"), Some(0));
    assert_eq!(world.wagon_index("w2"), Some(1));
    assert_eq!(world.wagon_index("w3"), None);
}

#[test]
fn can_filter_compatible_wagons() {
    let mut reserved = test_wagon("reserved", 25.);
    reserved.status = WagonStatus::Reserved;
    let mut elsewhere = test_wagon("elsewhere", 25.);
    elsewhere.location = "depot".to_string();
    let mut tank = test_wagon("tank", 25.);
    tank.wagon_type = "BTPN".to_string();

    let world = create_test_world(
        vec![test_order("o1", 10.)],
        vec![test_wagon("w1", 25.), reserved, elsewhere, tank, test_wagon("w2", 60.)],
    );

    assert_eq!(world.compatible_wagons(0, TEST_PLANT).collect::<Vec<_>>(), vec![0, 4]);
}

#[test]
fn can_narrow_compatibility_by_order_wagon_types() {
    let mut open = test_wagon("open", 25.);
    open.wagon_type = "BOXN".to_string();
    let mut covered = test_wagon("covered", 25.);
    covered.wagon_type = "BCN".to_string();
    let mut material = test_material(TEST_MATERIAL, true);
    material.wagon_types = vec!["BOXN".to_string(), "BCN".to_string()];

    let world = WorldBuilder::default()
        .orders(vec![test_order("any", 10.), OrderBuilder::new("covered", 10.).wagon_types(&["BCN"]).build()])
        .wagons(vec![open, covered])
        .materials(vec![material])
        .build();

    assert_eq!(world.compatible_wagons(0, TEST_PLANT).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(world.compatible_wagons(1, TEST_PLANT).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn can_report_all_integrity_issues() {
    let mut broken_wagon = test_wagon("w1", 0.);
    broken_wagon.availability = TimeWindow::new(10., 0.);

    let result = WorldBuilder::default()
        .orders(vec![
            test_order("o1", 10.),
            test_order("o1", 5.),
            OrderBuilder::new("o2", 10.).material("ore").build(),
            OrderBuilder::new("o3", 10.).destination("nowhere").build(),
            OrderBuilder::new("o4", 10.).window(100., 0.).build(),
        ])
        .wagons(vec![broken_wagon])
        .try_build();

    let Err(PlanningError::DataIntegrity(issues)) = result else { unreachable!("expected integrity error") };
    let messages = issues.iter().map(|issue| issue.to_string()).collect::<Vec<_>>();

    assert!(messages.contains(&"order 'o1': duplicate id".to_string()));
    assert!(messages.contains(&"order 'o2': unknown material 'ore'".to_string()));
    assert!(messages.contains(&"order 'o3': destination 'nowhere' is unreachable from plant 'plant'".to_string()));
    assert!(messages.contains(&"order 'o4': delivery window is inverted".to_string()));
    assert!(messages.contains(&"wagon 'w1': capacity must be positive".to_string()));
    assert!(messages.contains(&"wagon 'w1': availability window is inverted".to_string()));
}

#[test]
fn can_reject_order_at_plant_without_loading_point() {
    let result = WorldBuilder::default()
        .orders(vec![OrderBuilder::new("o1", 10.).plant("mine").build()])
        .segments(vec![test_segment("mine", TEST_DESTINATION, 100., HOUR)])
        .try_build();

    let Err(PlanningError::DataIntegrity(issues)) = result else { unreachable!("expected integrity error") };
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "no loading point at plant 'mine'");
}

#[test]
fn can_create_next_version_sharing_network() {
    let world = create_test_world(vec![test_order("o1", 10.), test_order("o2", 20.)], test_wagons(2, 25.));
    let mut wagons = world.wagons.clone();
    wagons[0].status = WagonStatus::Reserved;

    let next = world.next_version(vec![world.orders[1].clone()], wagons, world.loading_points.clone()).unwrap();

    assert_eq!(next.version, 1);
    assert_eq!(next.orders.len(), 1);
    assert_eq!(next.order_index("o2"), Some(0));
    assert!(Arc::ptr_eq(&world.network, &next.network));
    assert_eq!(next.compatible_wagons(0, TEST_PLANT).collect::<Vec<_>>(), vec![1]);
    assert_eq!(world.version, 0);
}

#[test]
fn can_reject_next_version_with_invalid_booking() {
    let world = create_test_world(vec![test_order("o1", 10.)], test_wagons(1, 25.));
    let mut points = world.loading_points.clone();
    points[0].bookings.push(Booking { siding: 3, window: TimeWindow::new(0., HOUR), reference: "r1".to_string() });

    let result = world.next_version(world.orders.clone(), world.wagons.clone(), points);

    assert!(matches!(result, Err(PlanningError::DataIntegrity(_))));
}

parameterized_test! {can_check_bookings_on_same_siding, (second_siding, second_start, is_valid), {
    can_check_bookings_on_same_siding_impl(second_siding, second_start, is_valid);
}}

can_check_bookings_on_same_siding! {
    case01_overlap: (0, 0.5 * HOUR, false),
    case02_adjacent: (0, HOUR, true),
    case03_other_siding: (1, 0.5 * HOUR, true),
}

fn can_check_bookings_on_same_siding_impl(second_siding: usize, second_start: f64, is_valid: bool) {
    let world = create_test_world(vec![test_order("o1", 10.)], test_wagons(1, 25.));
    let mut points = world.loading_points.clone();
    points[0].sidings = 2;
    points[0].bookings.push(Booking { siding: 0, window: TimeWindow::new(0., HOUR), reference: "r1".to_string() });
    points[0].bookings.push(Booking {
        siding: second_siding,
        window: TimeWindow::new(second_start, second_start + HOUR),
        reference: "r2".to_string(),
    });

    let result = world.next_version(world.orders.clone(), world.wagons.clone(), points);

    assert_eq!(result.is_ok(), is_valid);
    if !is_valid {
        assert!(matches!(result, Err(PlanningError::DataIntegrity(_))));
    }
}
