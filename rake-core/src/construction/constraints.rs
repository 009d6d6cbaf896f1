//! Hard constraints of rake formation and a pure feasibility check of a composition.

#[cfg(test)]
#[path = "../../tests/unit/construction/constraints_test.rs"]
mod constraints_test;

use crate::models::PlanningPolicy;
use crate::models::common::{Duration, TimeWindow, Timestamp};
use crate::models::problem::{LoadingPoint, WorldState};
use crate::models::solution::RakeComposition;
use crate::utils::Float;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A precision used to compare tonnes and seconds.
pub(crate) const EPSILON: Float = 1E-6;

/// A kind of hard constraint.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ConstraintKind {
    /// Wagon type is not allowed for the order's material or its explicit requirements.
    MaterialCompatibility,
    /// Wagon is not available, at another plant, outside its availability or used twice.
    WagonAvailability,
    /// Wagon is overloaded or an order is not completely loaded.
    WagonCapacity,
    /// Wagon count is outside of rake length limits.
    RakeLength,
    /// Orders do not share origin plant and destination reachable by the route chain.
    RouteConsistency,
    /// Loading point handling mode is not allowed for the material.
    HandlingMode,
    /// Loading point throughput or slice capacity is exceeded.
    LoadingThroughput,
    /// Loading window overlaps another booking on the same siding.
    SidingOverlap,
    /// Gross weight, wagon height or gauge violates a segment restriction.
    RouteRestriction,
    /// Arrival is outside of the delivery window and delay is not tolerated.
    DeliveryWindow,
}

impl ConstraintKind {
    /// Returns a machine readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ConstraintKind::MaterialCompatibility => "MATERIAL_COMPATIBILITY",
            ConstraintKind::WagonAvailability => "WAGON_AVAILABILITY",
            ConstraintKind::WagonCapacity => "WAGON_CAPACITY",
            ConstraintKind::RakeLength => "RAKE_LENGTH",
            ConstraintKind::RouteConsistency => "ROUTE_CONSISTENCY",
            ConstraintKind::HandlingMode => "HANDLING_MODE",
            ConstraintKind::LoadingThroughput => "LOADING_THROUGHPUT",
            ConstraintKind::SidingOverlap => "SIDING_OVERLAP",
            ConstraintKind::RouteRestriction => "ROUTE_RESTRICTION",
            ConstraintKind::DeliveryWindow => "DELIVERY_WINDOW",
        }
    }
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A set of violated constraints.
pub type ViolationSet = BTreeSet<ConstraintKind>;

/// Keeps resources consumed by compositions accepted earlier in the same solution.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    used_wagons: FxHashSet<usize>,
    bookings: FxHashMap<usize, Vec<(usize, TimeWindow)>>,
}

impl Occupancy {
    /// Returns true if wagon is already used by another composition.
    pub fn is_wagon_used(&self, wagon: usize) -> bool {
        self.used_wagons.contains(&wagon)
    }

    /// Returns (siding, window) bookings of the loading point made by accepted compositions.
    pub fn bookings(&self, loading_point: usize) -> &[(usize, TimeWindow)] {
        self.bookings.get(&loading_point).map_or(&[], |bookings| bookings.as_slice())
    }

    /// Marks composition resources as consumed.
    pub fn accept(&mut self, composition: &RakeComposition) {
        self.used_wagons.extend(composition.assignments.iter().map(|assignment| assignment.wagon));
        self.bookings
            .entry(composition.loading_point)
            .or_default()
            .push((composition.siding, composition.loading.clone()));
    }
}

/// Checks hard constraints of compositions against the snapshot and policy.
pub struct ConstraintValidator<'a> {
    world: &'a WorldState,
    policy: &'a PlanningPolicy,
}

impl<'a> ConstraintValidator<'a> {
    /// Creates a new instance of `ConstraintValidator`.
    pub fn new(world: &'a WorldState, policy: &'a PlanningPolicy) -> Self {
        Self { world, policy }
    }

    /// Checks all hard constraints of the composition given resources consumed by `occupancy`.
    /// Returns the set of violated constraints if there is any.
    pub fn is_feasible(&self, composition: &RakeComposition, occupancy: &Occupancy) -> Result<(), ViolationSet> {
        let mut violations = ViolationSet::new();

        if composition.loading_point >= self.world.loading_points.len()
            || composition.orders.is_empty()
            || composition.orders.iter().any(|&order| order >= self.world.orders.len())
        {
            violations.insert(ConstraintKind::RouteConsistency);
            return Err(violations);
        }

        self.check_route_consistency(composition, &mut violations);
        self.check_wagons(composition, occupancy, &mut violations);
        self.check_capacity(composition, &mut violations);
        self.check_loading(composition, occupancy, &mut violations);
        self.check_route_restrictions(composition, &mut violations);
        self.check_delivery(composition, &mut violations);

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    fn check_route_consistency(&self, composition: &RakeComposition, violations: &mut ViolationSet) {
        let point = &self.world.loading_points[composition.loading_point];
        let route = self.world.route(composition.route);

        let is_consistent = route.origin == point.plant
            && composition.orders.iter().all(|&order| {
                let order = &self.world.orders[order];
                order.plant == point.plant && order.destination == route.destination
            });

        if !is_consistent {
            violations.insert(ConstraintKind::RouteConsistency);
        }
    }

    fn check_wagons(&self, composition: &RakeComposition, occupancy: &Occupancy, violations: &mut ViolationSet) {
        let point = &self.world.loading_points[composition.loading_point];

        composition.assignments.iter().for_each(|assignment| {
            let order = &self.world.orders[assignment.order];
            let wagon = &self.world.wagons[assignment.wagon];

            let is_compatible = self.world.material(order).is_some_and(|spec| spec.allows_wagon(order, &wagon.wagon_type));
            if !is_compatible {
                violations.insert(ConstraintKind::MaterialCompatibility);
            }

            let is_eligible = wagon.is_available()
                && wagon.location == point.plant
                && wagon.availability.contains(&composition.loading)
                && !occupancy.is_wagon_used(assignment.wagon);
            if !is_eligible {
                violations.insert(ConstraintKind::WagonAvailability);
            }
        });

        if !self.policy.wagon_sharing {
            let mut owners: FxHashMap<usize, usize> = FxHashMap::default();
            let is_shared = composition
                .assignments
                .iter()
                .any(|assignment| *owners.entry(assignment.wagon).or_insert(assignment.order) != assignment.order);
            if is_shared {
                violations.insert(ConstraintKind::WagonAvailability);
            }
        }

        let is_mode_allowed = composition
            .orders
            .iter()
            .filter_map(|&order| self.world.material(&self.world.orders[order]))
            .all(|spec| spec.allows_mode(point.mode));
        if !is_mode_allowed {
            violations.insert(ConstraintKind::HandlingMode);
        }
    }

    fn check_capacity(&self, composition: &RakeComposition, violations: &mut ViolationSet) {
        let wagon_loads = composition.wagon_loads();

        let is_overloaded = wagon_loads
            .iter()
            .any(|&(wagon, load)| load > self.world.wagons[wagon].capacity + EPSILON || load < 0.);

        let is_incomplete = composition.orders.iter().any(|&order_idx| {
            let order = &self.world.orders[order_idx];
            let is_split = composition.assignments.iter().filter(|assignment| assignment.order == order_idx).count() > 1;
            let is_splittable = self.world.material(order).is_some_and(|spec| spec.splittable);

            (composition.order_load(order_idx) - order.quantity).abs() > EPSILON || (is_split && !is_splittable)
        });

        if is_overloaded || is_incomplete {
            violations.insert(ConstraintKind::WagonCapacity);
        }

        let length = &self.policy.rake_length;
        if wagon_loads.len() < length.min || wagon_loads.len() > length.max {
            violations.insert(ConstraintKind::RakeLength);
        }
    }

    fn check_loading(&self, composition: &RakeComposition, occupancy: &Occupancy, violations: &mut ViolationSet) {
        let point = &self.world.loading_points[composition.loading_point];
        let required = point.loading_duration(composition.total_load());

        let is_throughput_ok = composition.loading.is_valid()
            && composition.loading.duration() + EPSILON >= required
            && fits_slice_capacity(
                point,
                occupancy.bookings(composition.loading_point),
                &composition.loading,
                self.world.start,
                self.policy.slice_length,
            );
        if !is_throughput_ok {
            violations.insert(ConstraintKind::LoadingThroughput);
        }

        let is_siding_free = composition.siding < point.sidings
            && is_siding_free(
                point,
                occupancy.bookings(composition.loading_point),
                composition.siding,
                &composition.loading,
            );
        if !is_siding_free {
            violations.insert(ConstraintKind::SidingOverlap);
        }
    }

    fn check_route_restrictions(&self, composition: &RakeComposition, violations: &mut ViolationSet) {
        let gross_weight = composition.gross_weight(self.world);
        let wagons = composition.wagons();
        let max_height = wagons.iter().map(|&wagon| self.world.wagons[wagon].profile.height).fold(0., Float::max);

        let is_violated = self.world.route(composition.route).segments.iter().any(|&segment| {
            let restriction = &self.world.network.segment(segment).restriction;

            restriction.max_gross_weight.is_some_and(|limit| gross_weight > limit + EPSILON)
                || restriction.max_height.is_some_and(|limit| max_height > limit + EPSILON)
                || restriction.gauge.as_ref().is_some_and(|gauge| {
                    wagons.iter().any(|&wagon| self.world.wagons[wagon].profile.gauge != *gauge)
                })
        });

        if is_violated {
            violations.insert(ConstraintKind::RouteRestriction);
        }
    }

    fn check_delivery(&self, composition: &RakeComposition, violations: &mut ViolationSet) {
        let transit_time = self.world.route(composition.route).transit_time;
        let is_timing_consistent = composition.dispatch + EPSILON >= composition.loading.end
            && (composition.arrival - (composition.dispatch + transit_time)).abs() < EPSILON;

        let is_window_ok = composition.orders.iter().all(|&order| {
            let order = &self.world.orders[order];
            let is_early = composition.arrival + EPSILON < order.window.start;
            let is_late = composition.arrival > order.window.end + EPSILON;

            !is_early && (!is_late || self.policy.is_delay_tolerated(order))
        });

        if !is_timing_consistent || !is_window_ok {
            violations.insert(ConstraintKind::DeliveryWindow);
        }
    }
}

/// Returns a slice index of the timestamp, slices are aligned to the planning start.
pub(crate) fn slice_index(time: Timestamp, start: Timestamp, slice_length: Duration) -> i64 {
    ((time - start) / slice_length).floor() as i64
}

/// Returns time window of the slice with the given index.
pub(crate) fn slice_window(index: i64, start: Timestamp, slice_length: Duration) -> TimeWindow {
    let slice_start = start + index as Float * slice_length;
    TimeWindow::new(slice_start, slice_start + slice_length)
}

/// Returns loading time already booked at the loading point within the slice.
pub(crate) fn slice_usage(point: &LoadingPoint, accepted: &[(usize, TimeWindow)], slice: &TimeWindow) -> Duration {
    point.bookings.iter().map(|booking| &booking.window).chain(accepted.iter().map(|(_, window)| window)).fold(
        0.,
        |acc, window| acc + window.overlap_duration(slice),
    )
}

/// Checks that the loading window fits the slice capacity of every slice it touches.
pub(crate) fn fits_slice_capacity(
    point: &LoadingPoint,
    accepted: &[(usize, TimeWindow)],
    loading: &TimeWindow,
    start: Timestamp,
    slice_length: Duration,
) -> bool {
    let first = slice_index(loading.start, start, slice_length);
    let last = slice_index((loading.end - EPSILON).max(loading.start), start, slice_length);

    (first..=last).all(|index| {
        let slice = slice_window(index, start, slice_length);
        slice_usage(point, accepted, &slice) + loading.overlap_duration(&slice) <= point.slice_capacity + EPSILON
    })
}

/// Checks that the loading window does not overlap other bookings on the siding.
pub(crate) fn is_siding_free(
    point: &LoadingPoint,
    accepted: &[(usize, TimeWindow)],
    siding: usize,
    loading: &TimeWindow,
) -> bool {
    let mut bookings = point
        .siding_bookings(siding)
        .chain(accepted.iter().filter(|(other, _)| *other == siding).map(|(_, window)| window));

    !bookings.any(|window| window.overlaps(loading))
}
