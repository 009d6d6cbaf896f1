//! This module provides functionality to automatically check that a given plan is feasible for
//! its snapshot: every order is placed exactly once, no hard constraint is violated and reported
//! objectives match the ones recalculated from compositions.

#[cfg(test)]
#[path = "../../tests/unit/checker/checker_test.rs"]
mod checker_test;

use crate::format::plan::*;
use crate::format::{FormatError, MultiFormatError};
use crate::parse_time;
use rake_core::models::PlanningPolicy;
use rake_core::models::common::TimeWindow;
use rake_core::models::problem::WorldState;
use rake_core::models::solution::{Assignment, RakeComposition};
use std::sync::Arc;

mod assignment;
use self::assignment::check_assignment;

mod composition;
use self::composition::check_compositions;

/// Stores snapshot, policy and plan together and provides some helper methods.
pub struct CheckerContext {
    /// A snapshot the plan was computed for.
    pub world: Arc<WorldState>,
    /// A policy used to compute the plan.
    pub policy: Arc<PlanningPolicy>,
    /// A plan to be checked.
    pub plan: Plan,
}

impl CheckerContext {
    /// Creates an instance of `CheckerContext`.
    pub fn new(world: Arc<WorldState>, policy: Arc<PlanningPolicy>, plan: Plan) -> Self {
        Self { world, policy, plan }
    }

    /// Performs plan check.
    pub fn check(&self) -> Result<(), MultiFormatError> {
        // avoid duplicates keeping original order
        let errors = check_assignment(self).err().into_iter().chain(check_compositions(self).err()).flatten().fold(
            Vec::<FormatError>::default(),
            |mut errors, error| {
                if !errors.contains(&error) {
                    errors.push(error);
                }
                errors
            },
        );

        if errors.is_empty() { Ok(()) } else { Err(errors.into()) }
    }

    /// Gets order index by its id.
    fn get_order(&self, order_id: &str) -> Result<usize, FormatError> {
        self.world.order_index(order_id).ok_or_else(|| unknown_id_error("order", order_id))
    }

    /// Gets wagon index by its id.
    fn get_wagon(&self, wagon_id: &str) -> Result<usize, FormatError> {
        self.world.wagon_index(wagon_id).ok_or_else(|| unknown_id_error("wagon", wagon_id))
    }

    /// Gets loading point index by its id.
    fn get_loading_point(&self, point_id: &str) -> Result<usize, FormatError> {
        self.world
            .loading_points
            .iter()
            .position(|point| point.id == point_id)
            .ok_or_else(|| unknown_id_error("loading point", point_id))
    }

    /// Gets route chain index which passes through the given stations starting at the plant.
    fn get_route(&self, plant: &str, stations: &[String]) -> Result<usize, FormatError> {
        let destination = stations.last().map(|station| station.as_str()).unwrap_or_default();

        self.world
            .lanes(plant, destination)
            .iter()
            .copied()
            .find(|&route| get_route_stations(&self.world, route).as_slice() == stations)
            .ok_or_else(|| unknown_id_error("route", stations.join("->").as_str()))
    }

    /// Rebuilds core composition from the rake.
    fn get_composition(&self, rake: &Rake) -> Result<RakeComposition, FormatError> {
        let loading_point = self.get_loading_point(&rake.loading_point)?;
        let route = self.get_route(&self.world.loading_points[loading_point].plant, &rake.route)?;

        let orders = rake.orders.iter().map(|order_id| self.get_order(order_id)).collect::<Result<Vec<_>, _>>()?;
        let assignments = rake
            .wagons
            .iter()
            .flat_map(|wagon| wagon.loads.iter().map(move |load| (wagon, load)))
            .map(|(wagon, load)| -> Result<Assignment, FormatError> {
                let order = self.get_order(&load.order_id)?;
                let wagon = self.get_wagon(&wagon.wagon_id)?;

                Ok(Assignment { order, wagon, load: load.load })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let loading = TimeWindow::new(self.get_time(rake, &rake.loading.start)?, self.get_time(rake, &rake.loading.end)?);

        Ok(RakeComposition {
            loading_point,
            route,
            siding: rake.siding,
            orders,
            assignments,
            loading,
            dispatch: self.get_time(rake, &rake.dispatch)?,
            arrival: self.get_time(rake, &rake.arrival)?,
        })
    }

    fn get_time(&self, rake: &Rake, time: &str) -> Result<f64, FormatError> {
        parse_time(time).map_err(|err| {
            FormatError::new(
                "E2003".to_string(),
                format!("rake '{}' has invalid time", rake.id),
                format!("use RFC3339 time: {err}"),
            )
        })
    }
}

fn unknown_id_error(kind: &str, id: &str) -> FormatError {
    FormatError::new(
        "E2001".to_string(),
        format!("plan refers to unknown {kind} '{id}'"),
        "check that plan is created for the given snapshot".to_string(),
    )
}
