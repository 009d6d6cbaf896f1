use super::*;
use crate::helpers::*;

fn get_codes(snapshot: &Snapshot) -> Vec<String> {
    validate_fleet(&ValidationContext::new(snapshot))
        .err()
        .map_or(vec![], |err| err.errors.into_iter().map(|err| err.code).collect())
}

#[test]
fn can_accept_valid_fleet() {
    let snapshot = create_test_snapshot(vec![], create_wagons(3, 60.));

    assert!(get_codes(&snapshot).is_empty());
}

#[test]
fn can_detect_duplicate_wagon_ids() {
    let snapshot = create_test_snapshot(vec![], vec![create_wagon("w1", 60.), create_wagon("w1", 60.)]);

    let result = check_e1100_no_wagons_with_duplicate_ids(&ValidationContext::new(&snapshot));

    assert_eq!(result.err().map(|err| err.action), Some("remove duplicates or use unique ids, ids: 'w1'".to_string()));
}

parameterized_test! {can_detect_invalid_wagon, (capacity, availability, profile, expected), {
    can_detect_invalid_wagon_impl(capacity, availability, profile, expected);
}}

can_detect_invalid_wagon! {
    case01_valid: (60., Some(vec![at_hours(0.), at_hours(10.)]), Some((20., 4.)), vec![]),
    case02_zero_capacity: (0., None, None, vec!["E1101"]),
    case03_inverted_availability: (60., Some(vec![at_hours(10.), at_hours(0.)]), None, vec!["E1102"]),
    case04_negative_tare: (60., None, Some((-1., 4.)), vec!["E1103"]),
    case05_all: (-1., Some(vec![]), Some((1., -4.)), vec!["E1101", "E1102", "E1103"]),
}

fn can_detect_invalid_wagon_impl(
    capacity: f64,
    availability: Option<Vec<String>>,
    profile: Option<(f64, f64)>,
    expected: Vec<&str>,
) {
    let wagon = Wagon {
        availability,
        profile: profile.map(|(tare, height)| WagonProfile { tare, height, gauge: "broad".to_string() }),
        ..create_wagon("w1", capacity)
    };
    let snapshot = create_test_snapshot(vec![], vec![wagon]);

    assert_eq!(get_codes(&snapshot), expected);
}

parameterized_test! {can_detect_invalid_loading_point, (throughput, sidings, slice_capacity, booking_siding, expected), {
    can_detect_invalid_loading_point_impl(throughput, sidings, slice_capacity, booking_siding, expected);
}}

can_detect_invalid_loading_point! {
    case01_valid: (100., 2, 24., Some(1), vec![]),
    case02_zero_throughput: (0., 1, 24., None, vec!["E1201"]),
    case03_no_sidings: (100., 0, 24., None, vec!["E1201"]),
    case04_zero_slice_capacity: (100., 1, 0., None, vec!["E1202"]),
    case05_unknown_siding: (100., 1, 24., Some(1), vec!["E1203"]),
}

fn can_detect_invalid_loading_point_impl(
    throughput: f64,
    sidings: usize,
    slice_capacity: f64,
    booking_siding: Option<usize>,
    expected: Vec<&str>,
) {
    let bookings = booking_siding
        .map(|siding| Booking { siding, window: vec![at_hours(1.), at_hours(2.)], reference: "r1".to_string() })
        .into_iter()
        .collect();
    let mut snapshot = create_test_snapshot(vec![], vec![]);
    snapshot.loading_points =
        vec![LoadingPoint { throughput, sidings, slice_capacity, bookings, ..create_loading_point("lp1") }];

    assert_eq!(get_codes(&snapshot), expected);
}

#[test]
fn can_detect_duplicate_loading_point_ids() {
    let mut snapshot = create_test_snapshot(vec![], vec![]);
    snapshot.loading_points = vec![create_loading_point("lp1"), create_loading_point("lp1")];

    assert_eq!(get_codes(&snapshot), vec!["E1200"]);
}

parameterized_test! {can_detect_overlapping_bookings, (second_siding, second_start, expected), {
    can_detect_overlapping_bookings_impl(second_siding, second_start, expected);
}}

can_detect_overlapping_bookings! {
    case01_overlap: (0, 1.5, vec!["E1204"]),
    case02_adjacent: (0, 2., vec![]),
    case03_other_siding: (1, 1.5, vec![]),
}

fn can_detect_overlapping_bookings_impl(second_siding: usize, second_start: f64, expected: Vec<&str>) {
    let bookings = vec![
        Booking { siding: 0, window: vec![at_hours(1.), at_hours(2.)], reference: "r1".to_string() },
        Booking {
            siding: second_siding,
            window: vec![at_hours(second_start), at_hours(second_start + 1.)],
            reference: "r2".to_string(),
        },
    ];
    let mut snapshot = create_test_snapshot(vec![], vec![]);
    snapshot.loading_points = vec![LoadingPoint { sidings: 2, bookings, ..create_loading_point("lp1") }];

    assert_eq!(get_codes(&snapshot), expected);
}
