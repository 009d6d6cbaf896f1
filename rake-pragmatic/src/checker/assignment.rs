#[cfg(test)]
#[path = "../../tests/unit/checker/assignment_test.rs"]
mod assignment_test;

use super::*;
use crate::utils::combine_error_results;
use std::collections::{HashMap, HashSet};

/// Checks assignment of orders and wagons to rakes.
pub fn check_assignment(ctx: &CheckerContext) -> Result<(), Vec<FormatError>> {
    combine_error_results(&[
        check_snapshot_version(ctx),
        check_known_ids(ctx),
        check_order_coverage(ctx),
        check_rake_orders(ctx),
    ])
}

/// Checks that plan is computed for the given snapshot version.
fn check_snapshot_version(ctx: &CheckerContext) -> Result<(), FormatError> {
    if ctx.plan.snapshot_version == ctx.world.version {
        Ok(())
    } else {
        Err(FormatError::new(
            "E2000".to_string(),
            format!(
                "plan is computed for snapshot v{}, but snapshot is v{}",
                ctx.plan.snapshot_version, ctx.world.version
            ),
            "replan over the current snapshot".to_string(),
        ))
    }
}

/// Checks that all ids used by the plan are known in the snapshot.
fn check_known_ids(ctx: &CheckerContext) -> Result<(), FormatError> {
    ctx.plan.rakes.iter().try_for_each(|rake| {
        let loading_point = ctx.get_loading_point(&rake.loading_point)?;
        ctx.get_route(&ctx.world.loading_points[loading_point].plant, &rake.route)?;

        rake.orders.iter().try_for_each(|order_id| ctx.get_order(order_id).map(|_| ()))?;
        rake.wagons.iter().try_for_each(|wagon| {
            ctx.get_wagon(&wagon.wagon_id)?;
            wagon.loads.iter().try_for_each(|load| ctx.get_order(&load.order_id).map(|_| ()))
        })
    })?;

    ctx.plan.deferred.iter().try_for_each(|deferral| ctx.get_order(&deferral.order_id).map(|_| ()))
}

/// Checks that every order of the snapshot is either dispatched once or deferred once.
fn check_order_coverage(ctx: &CheckerContext) -> Result<(), FormatError> {
    let placed = ctx
        .plan
        .rakes
        .iter()
        .flat_map(|rake| rake.orders.iter())
        .chain(ctx.plan.deferred.iter().map(|deferral| &deferral.order_id))
        .fold(HashMap::<&str, usize>::new(), |mut placed, order_id| {
            *placed.entry(order_id.as_str()).or_default() += 1;
            placed
        });

    let duplicated = ctx
        .world
        .orders
        .iter()
        .filter(|order| placed.get(order.id.as_str()).is_some_and(|&count| count > 1))
        .map(|order| order.id.clone())
        .collect::<Vec<_>>();
    let missing = ctx
        .world
        .orders
        .iter()
        .filter(|order| !placed.contains_key(order.id.as_str()))
        .map(|order| order.id.clone())
        .collect::<Vec<_>>();

    if duplicated.is_empty() && missing.is_empty() {
        Ok(())
    } else {
        Err(FormatError::new(
            "E2002".to_string(),
            "orders are not placed exactly once".to_string(),
            format!("duplicated: '{}', missing: '{}'", duplicated.join(", "), missing.join(", ")),
        ))
    }
}

/// Checks that rake orders are the ones loaded on its wagons.
fn check_rake_orders(ctx: &CheckerContext) -> Result<(), FormatError> {
    let ids = ctx
        .plan
        .rakes
        .iter()
        .filter(|rake| {
            let declared = rake.orders.iter().map(|order_id| order_id.as_str()).collect::<HashSet<_>>();
            let loaded = rake
                .wagons
                .iter()
                .flat_map(|wagon| wagon.loads.iter())
                .map(|load| load.order_id.as_str())
                .collect::<HashSet<_>>();

            declared != loaded || declared.len() != rake.orders.len()
        })
        .map(|rake| rake.id.clone())
        .collect::<Vec<_>>();

    if ids.is_empty() {
        Ok(())
    } else {
        Err(FormatError::new(
            "E2005".to_string(),
            "rake orders do not match orders loaded on its wagons".to_string(),
            format!("check wagon loads of rakes, ids: '{}'", ids.join(", ")),
        ))
    }
}
