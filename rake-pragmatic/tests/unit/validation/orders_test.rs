use super::*;
use crate::helpers::*;

fn create_context_snapshot(orders: Vec<Order>) -> Snapshot {
    create_test_snapshot(orders, create_wagons(1, 60.))
}

#[test]
fn can_detect_duplicate_order_ids() {
    let snapshot =
        create_context_snapshot(vec![create_order("o1", 1.), create_order("o2", 1.), create_order("o1", 1.)]);

    let result = check_e1000_no_orders_with_duplicate_ids(&ValidationContext::new(&snapshot));

    assert_eq!(
        result.err().map(|err| (err.code, err.action)),
        Some(("E1000".to_string(), "remove duplicates or use unique ids, ids: 'o1'".to_string()))
    );
}

parameterized_test! {can_detect_invalid_quantity, (quantity, expected), {
    can_detect_invalid_quantity_impl(quantity, expected);
}}

can_detect_invalid_quantity! {
    case01_positive: (10., None),
    case02_zero: (0., Some("E1001")),
    case03_negative: (-5., Some("E1001")),
    case04_nan: (f64::NAN, Some("E1001")),
}

fn can_detect_invalid_quantity_impl(quantity: f64, expected: Option<&str>) {
    let snapshot = create_context_snapshot(vec![create_order("o1", quantity)]);

    let result = check_e1001_positive_quantity(&ValidationContext::new(&snapshot));

    assert_eq!(result.err().map(|err| err.code), expected.map(|code| code.to_string()));
}

parameterized_test! {can_detect_invalid_delivery_window, (window, is_valid), {
    can_detect_invalid_delivery_window_impl(window, is_valid);
}}

can_detect_invalid_delivery_window! {
    case01_valid: (vec![at_hours(1.), at_hours(2.)], true),
    case02_same_time: (vec![at_hours(1.), at_hours(1.)], true),
    case03_inverted: (vec![at_hours(2.), at_hours(1.)], false),
    case04_single_time: (vec![at_hours(1.)], false),
    case05_not_a_time: (vec!["tomorrow".to_string(), at_hours(1.)], false),
}

fn can_detect_invalid_delivery_window_impl(window: Vec<String>, is_valid: bool) {
    let snapshot = create_context_snapshot(vec![Order { window, ..create_order("o1", 1.) }]);

    let result = check_e1002_delivery_window_correctness(&ValidationContext::new(&snapshot));

    assert_eq!(result.is_ok(), is_valid);
}

#[test]
fn can_detect_unknown_material() {
    let snapshot = create_context_snapshot(vec![Order { material: "ore".to_string(), ..create_order("o1", 1.) }]);

    let result = check_e1003_known_material(&ValidationContext::new(&snapshot));

    assert_eq!(result.err().map(|err| err.code), Some("E1003".to_string()));
}

#[test]
fn can_detect_plant_without_loading_point() {
    let snapshot = create_context_snapshot(vec![Order { plant: "plant2".to_string(), ..create_order("o1", 1.) }]);

    let result = check_e1004_known_plant(&ValidationContext::new(&snapshot));

    assert_eq!(result.err().map(|err| err.code), Some("E1004".to_string()));
}

#[test]
fn can_detect_destination_without_routes() {
    let snapshot =
        create_context_snapshot(vec![Order { destination: "city2".to_string(), ..create_order("o1", 1.) }]);

    let result = check_e1005_known_destination(&ValidationContext::new(&snapshot));

    assert_eq!(result.err().map(|err| err.code), Some("E1005".to_string()));
}

#[test]
fn can_combine_all_order_errors() {
    let snapshot = create_context_snapshot(vec![
        create_order("o1", 0.),
        Order { material: "ore".to_string(), ..create_order("o1", 1.) },
    ]);

    let result = validate_orders(&ValidationContext::new(&snapshot));

    assert_eq!(result.err().map(|err| err.codes().join(",")), Some("E1000,E1001,E1003".to_string()));
}
