#[cfg(test)]
#[path = "../../tests/unit/validation/fleet_test.rs"]
mod fleet_test;

use super::*;
use crate::utils::combine_error_results;

/// Checks that wagon pool has no wagons with duplicate ids.
fn check_e1100_no_wagons_with_duplicate_ids(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = get_duplicates(ctx.wagons().map(|wagon| &wagon.id)).into_iter().cloned().collect();

    check_ids("E1100", "duplicated wagon ids", "remove duplicates or use unique ids", ids)
}

/// Checks that wagon capacity is positive.
fn check_e1101_positive_capacity(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .wagons()
        .filter(|wagon| !wagon.capacity.is_finite() || wagon.capacity <= 0.)
        .map(|wagon| wagon.id.clone())
        .collect();

    check_ids("E1101", "wagon capacity must be positive", "change capacity of wagons", ids)
}

/// Checks that availability windows are correct.
fn check_e1102_availability_correctness(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .wagons()
        .filter(|wagon| wagon.availability.as_ref().is_some_and(|window| !is_valid_time_window(window)))
        .map(|wagon| wagon.id.clone())
        .collect();

    check_ids("E1102", "invalid availability window in wagons", "check availability times of wagons", ids)
}

/// Checks that wagon profiles have no negative values.
fn check_e1103_profile_correctness(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .wagons()
        .filter(|wagon| wagon.profile.as_ref().is_some_and(|profile| profile.tare < 0. || profile.height < 0.))
        .map(|wagon| wagon.id.clone())
        .collect();

    check_ids("E1103", "wagon profile has negative values", "change tare weight or height of wagons", ids)
}

/// Checks that loading points have unique ids.
fn check_e1200_no_loading_points_with_duplicate_ids(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = get_duplicates(ctx.loading_points().map(|point| &point.id)).into_iter().cloned().collect();

    check_ids("E1200", "duplicated loading point ids", "remove duplicates or use unique ids", ids)
}

/// Checks that loading point throughput and amount of sidings are positive.
fn check_e1201_positive_throughput(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .loading_points()
        .filter(|point| !point.throughput.is_finite() || point.throughput <= 0. || point.sidings == 0)
        .map(|point| point.id.clone())
        .collect();

    check_ids("E1201", "throughput and amount of sidings must be positive", "change loading points", ids)
}

/// Checks that slice capacity is positive and free time is not negative.
fn check_e1202_slice_capacity_correctness(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .loading_points()
        .filter(|point| point.slice_capacity <= 0. || point.free_time < 0.)
        .map(|point| point.id.clone())
        .collect();

    check_ids("E1202", "invalid slice capacity or free time", "change loading points", ids)
}

/// Checks that bookings refer to existing sidings and have valid windows.
fn check_e1203_booking_correctness(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .loading_points()
        .filter(|point| {
            point.bookings.iter().any(|booking| booking.siding >= point.sidings || !is_valid_time_window(&booking.window))
        })
        .map(|point| point.id.clone())
        .collect();

    check_ids("E1203", "invalid bookings in loading points", "check siding index and window of bookings", ids)
}

/// Checks that bookings of the same siding do not overlap.
fn check_e1204_no_overlapping_bookings(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .loading_points()
        .filter(|point| {
            let bookings = point
                .bookings
                .iter()
                .filter_map(|booking| parse_time_window(&booking.window).map(|window| (booking.siding, window)))
                .collect::<Vec<_>>();

            bookings.iter().enumerate().any(|(idx, &(siding, (start, end)))| {
                bookings.iter().skip(idx + 1).any(|&(other_siding, (other_start, other_end))| {
                    siding == other_siding && start < other_end && other_start < end
                })
            })
        })
        .map(|point| point.id.clone())
        .collect();

    check_ids("E1204", "overlapping bookings on the same siding", "move or merge bookings of the siding", ids)
}

/// Validates wagons and loading points.
pub fn validate_fleet(ctx: &ValidationContext) -> Result<(), MultiFormatError> {
    combine_error_results(&[
        check_e1100_no_wagons_with_duplicate_ids(ctx),
        check_e1101_positive_capacity(ctx),
        check_e1102_availability_correctness(ctx),
        check_e1103_profile_correctness(ctx),
        check_e1200_no_loading_points_with_duplicate_ids(ctx),
        check_e1201_positive_throughput(ctx),
        check_e1202_slice_capacity_correctness(ctx),
        check_e1203_booking_correctness(ctx),
        check_e1204_no_overlapping_bookings(ctx),
    ])
    .map_err(From::from)
}
