#[cfg(test)]
#[path = "../../tests/unit/validation/orders_test.rs"]
mod orders_test;

use super::*;
use crate::utils::combine_error_results;
use std::collections::HashSet;

/// Checks that backlog has no orders with duplicate ids.
fn check_e1000_no_orders_with_duplicate_ids(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = get_duplicates(ctx.orders().map(|order| &order.id)).into_iter().cloned().collect();

    check_ids("E1000", "duplicated order ids", "remove duplicates or use unique ids", ids)
}

/// Checks that order quantity is positive.
fn check_e1001_positive_quantity(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx
        .orders()
        .filter(|order| !order.quantity.is_finite() || order.quantity <= 0.)
        .map(|order| order.id.clone())
        .collect();

    check_ids("E1001", "order quantity must be positive", "change quantity of orders", ids)
}

/// Checks that delivery windows are correct.
fn check_e1002_delivery_window_correctness(ctx: &ValidationContext) -> Result<(), FormatError> {
    let ids = ctx.orders().filter(|order| !is_valid_time_window(&order.window)).map(|order| order.id.clone()).collect();

    check_ids(
        "E1002",
        "invalid delivery window in orders",
        "check that window has two RFC3339 times and start is not after end",
        ids,
    )
}

/// Checks that order material is defined in the catalog.
fn check_e1003_known_material(ctx: &ValidationContext) -> Result<(), FormatError> {
    let materials = ctx.snapshot.materials.iter().map(|material| material.id.as_str()).collect::<HashSet<_>>();
    let ids = ctx
        .orders()
        .filter(|order| !materials.contains(order.material.as_str()))
        .map(|order| order.id.clone())
        .collect();

    check_ids("E1003", "order refers to unknown material", "add material to the catalog or change orders", ids)
}

/// Checks that order plant has at least one loading point.
fn check_e1004_known_plant(ctx: &ValidationContext) -> Result<(), FormatError> {
    let plants = ctx.loading_points().map(|point| point.plant.as_str()).collect::<HashSet<_>>();
    let ids = ctx.orders().filter(|order| !plants.contains(order.plant.as_str())).map(|order| order.id.clone()).collect();

    check_ids("E1004", "order plant has no loading point", "add loading point to the plant or change orders", ids)
}

/// Checks that some route segment arrives at order destination.
fn check_e1005_known_destination(ctx: &ValidationContext) -> Result<(), FormatError> {
    let destinations = ctx.snapshot.routes.iter().map(|segment| segment.destination.as_str()).collect::<HashSet<_>>();
    let ids = ctx
        .orders()
        .filter(|order| !destinations.contains(order.destination.as_str()))
        .map(|order| order.id.clone())
        .collect();

    check_ids("E1005", "order destination is not served by any route", "add route segments or change orders", ids)
}

/// Validates orders from the backlog.
pub fn validate_orders(ctx: &ValidationContext) -> Result<(), MultiFormatError> {
    combine_error_results(&[
        check_e1000_no_orders_with_duplicate_ids(ctx),
        check_e1001_positive_quantity(ctx),
        check_e1002_delivery_window_correctness(ctx),
        check_e1003_known_material(ctx),
        check_e1004_known_plant(ctx),
        check_e1005_known_destination(ctx),
    ])
    .map_err(From::from)
}
