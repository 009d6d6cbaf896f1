//! Turns composition drafts into scheduled rake compositions: packs wagons, picks siding and times.

#[cfg(test)]
#[path = "../../tests/unit/construction/decoder_test.rs"]
mod decoder_test;

use super::constraints::*;
use crate::models::PlanningPolicy;
use crate::models::common::{Duration, TimeWindow, Timestamp};
use crate::models::problem::{LoadingPoint, WorldState};
use crate::models::solution::*;
use crate::utils::{Float, compare_floats};

/// Amount of time slices after the desired start which are searched for a free loading slot.
const SLOT_HORIZON_SLICES: i64 = 30;

/// Decodes drafts into compositions and solutions using deterministic wagon packing and siding scheduling.
pub struct Decoder<'a> {
    world: &'a WorldState,
    policy: &'a PlanningPolicy,
    validator: ConstraintValidator<'a>,
}

impl<'a> Decoder<'a> {
    /// Creates a new instance of `Decoder`.
    pub fn new(world: &'a WorldState, policy: &'a PlanningPolicy) -> Self {
        Self { world, policy, validator: ConstraintValidator::new(world, policy) }
    }

    /// Returns the snapshot used by decoder.
    pub fn world(&self) -> &'a WorldState {
        self.world
    }

    /// Returns planning policy used by decoder.
    pub fn policy(&self) -> &'a PlanningPolicy {
        self.policy
    }

    /// Builds a validated composition from the draft given resources consumed by `occupancy`.
    pub fn compose(&self, draft: &RakeDraft, occupancy: &Occupancy) -> Result<RakeComposition, ViolationSet> {
        let violated = |kind: ConstraintKind| Err(ViolationSet::from([kind]));

        if draft.orders.is_empty()
            || draft.loading_point >= self.world.loading_points.len()
            || draft.route >= self.world.route_count()
            || draft.orders.iter().any(|&order| order >= self.world.orders.len())
        {
            return violated(ConstraintKind::RouteConsistency);
        }

        let point = &self.world.loading_points[draft.loading_point];
        let route = self.world.route(draft.route);

        let is_consistent = route.origin == point.plant
            && draft.orders.iter().all(|&order| {
                let order = &self.world.orders[order];
                order.plant == point.plant && order.destination == route.destination
            });
        if !is_consistent {
            return violated(ConstraintKind::RouteConsistency);
        }

        let assignments = self.pack(point, draft, occupancy)?;
        let wagon_count = count_wagons(&assignments);
        if wagon_count < self.policy.rake_length.min || wagon_count > self.policy.rake_length.max {
            return violated(ConstraintKind::RakeLength);
        }

        let total_load = assignments.iter().map(|assignment| assignment.load).sum::<Float>();
        let duration = point.loading_duration(total_load);
        let transit_time = route.transit_time;

        let earliest_arrival = draft
            .orders
            .iter()
            .map(|&order| self.world.orders[order].window.start)
            .fold(Float::NEG_INFINITY, Float::max);
        let ready = assignments
            .iter()
            .map(|assignment| self.world.wagons[assignment.wagon].availability.start)
            .fold(self.world.start, Float::max);
        let desired = ready.max(earliest_arrival - transit_time - duration);

        let (siding, start) = self
            .find_slot(point, occupancy.bookings(draft.loading_point), desired, duration)
            .ok_or_else(|| ViolationSet::from([ConstraintKind::LoadingThroughput]))?;

        let loading = TimeWindow::new(start, start + duration);
        let dispatch = loading.end.max(earliest_arrival - transit_time);

        let composition = RakeComposition {
            loading_point: draft.loading_point,
            route: draft.route,
            siding,
            orders: draft.orders.clone(),
            assignments,
            loading,
            dispatch,
            arrival: dispatch + transit_time,
        };

        self.validator.is_feasible(&composition, occupancy)?;

        Ok(composition)
    }

    /// Decodes drafts in booking sequence into a solution, `deferred` orders are diagnosed.
    /// Fails when any draft cannot be turned into a feasible composition.
    pub fn decode(&self, drafts: &[RakeDraft], deferred: &[usize]) -> Result<Solution, ViolationSet> {
        let mut occupancy = Occupancy::default();

        let compositions = drafts
            .iter()
            .filter(|draft| !draft.orders.is_empty())
            .map(|draft| {
                let composition = self.compose(draft, &occupancy)?;
                occupancy.accept(&composition);
                Ok::<_, ViolationSet>(composition)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut deferred = deferred.to_vec();
        deferred.sort_unstable();
        deferred.dedup();

        let deferred = deferred.into_iter().map(|order| self.diagnose(order, &occupancy)).collect();

        Ok(Solution { compositions, deferred })
    }

    /// Returns occupancy of all compositions in the solution.
    pub fn occupancy(&self, solution: &Solution) -> Occupancy {
        solution.compositions.iter().fold(Occupancy::default(), |mut occupancy, composition| {
            occupancy.accept(composition);
            occupancy
        })
    }

    /// Explains why the order cannot be dispatched given consumed resources.
    pub fn diagnose(&self, order_idx: usize, occupancy: &Occupancy) -> Deferral {
        let world = self.world;
        let order = world.orders[order_idx].as_ref();
        let deferral = |reason: DeferralReason, violations: &[ConstraintKind]| Deferral {
            order: order_idx,
            reason,
            violations: violations.iter().copied().collect(),
        };

        let compatible = world.compatible_wagons(order_idx, &order.plant).collect::<Vec<_>>();
        if compatible.is_empty() {
            let has_other_wagons = world.wagons.iter().any(|wagon| wagon.is_available() && wagon.location == order.plant);
            let kind =
                if has_other_wagons { ConstraintKind::MaterialCompatibility } else { ConstraintKind::WagonAvailability };

            return deferral(DeferralReason::NoCompatibleWagon, &[kind]);
        }

        let is_splittable = world.material(order).is_some_and(|spec| spec.splittable);
        let max_capacity = compatible.iter().map(|&wagon| world.wagons[wagon].capacity).fold(0., Float::max);

        if !is_splittable && order.quantity > max_capacity + EPSILON {
            return deferral(DeferralReason::InfeasibleSize, &[ConstraintKind::WagonCapacity]);
        }

        if order.quantity > max_capacity * self.policy.rake_length.max as Float + EPSILON {
            return deferral(DeferralReason::InfeasibleSize, &[ConstraintKind::WagonCapacity, ConstraintKind::RakeLength]);
        }

        if !self.policy.is_delay_tolerated(order) {
            let ready = compatible.iter().map(|&wagon| world.wagons[wagon].availability.start).fold(Float::MAX, Float::min);
            let loading = world
                .loading_points_at(&order.plant)
                .iter()
                .map(|&point| world.loading_points[point].loading_duration(order.quantity))
                .fold(Float::MAX, Float::min);
            let transit = world
                .lanes(&order.plant, &order.destination)
                .iter()
                .map(|&route| world.route(route).transit_time)
                .fold(Float::MAX, Float::min);

            if ready.max(world.start) + loading + transit > order.window.end + EPSILON {
                return deferral(DeferralReason::WindowMissed, &[ConstraintKind::DeliveryWindow]);
            }
        }

        let violations = world
            .options(order_idx, self.policy.route_alternatives)
            .into_iter()
            .map(|(loading_point, route)| {
                let draft = RakeDraft { loading_point, route, orders: vec![order_idx] };
                self.compose(&draft, occupancy).err().unwrap_or_default()
            })
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .unwrap_or_else(|| ViolationSet::from([ConstraintKind::RouteConsistency]));

        Deferral { order: order_idx, reason: DeferralReason::CapacityExhausted, violations }
    }

    fn pack(
        &self,
        point: &LoadingPoint,
        draft: &RakeDraft,
        occupancy: &Occupancy,
    ) -> Result<Vec<Assignment>, ViolationSet> {
        let violated = |kind: ConstraintKind| Err(ViolationSet::from([kind]));
        let mut assignments: Vec<Assignment> = Vec::new();

        for &order_idx in draft.orders.iter() {
            let order = self.world.orders[order_idx].as_ref();
            let Some(spec) = self.world.material(order) else {
                return violated(ConstraintKind::MaterialCompatibility);
            };

            let mut remaining = order.quantity;

            if self.policy.wagon_sharing {
                // fill residual capacity of wagons already taken by this composition
                let residuals = residual_capacities(self.world, &assignments);
                for (wagon, residual) in residuals {
                    let can_carry = spec.allows_wagon(order, &self.world.wagons[wagon].wagon_type);
                    let can_fit = spec.splittable || residual + EPSILON >= remaining;
                    if remaining > EPSILON && residual > EPSILON && can_carry && can_fit {
                        let load = remaining.min(residual);
                        assignments.push(Assignment { order: order_idx, wagon, load });
                        remaining -= load;
                        if !spec.splittable {
                            break;
                        }
                    }
                }
            }

            let mut candidates = self
                .world
                .compatible_wagons(order_idx, &point.plant)
                .filter(|&wagon| {
                    !occupancy.is_wagon_used(wagon) && assignments.iter().all(|assignment| assignment.wagon != wagon)
                })
                .collect::<Vec<_>>();
            candidates.sort_by(|&a, &b| {
                compare_floats(self.world.wagons[a].capacity, self.world.wagons[b].capacity).then_with(|| a.cmp(&b))
            });

            let mut is_first = true;
            while remaining > EPSILON {
                let best_fit = candidates.iter().position(|&wagon| self.world.wagons[wagon].capacity + EPSILON >= remaining);

                let position = match (best_fit, candidates.is_empty()) {
                    (Some(position), _) => position,
                    (None, true) => return violated(ConstraintKind::WagonAvailability),
                    (None, false) if !spec.splittable && is_first => return violated(ConstraintKind::WagonCapacity),
                    (None, false) => candidates.len() - 1,
                };

                let wagon = candidates.remove(position);
                let load = remaining.min(self.world.wagons[wagon].capacity);
                assignments.push(Assignment { order: order_idx, wagon, load });

                remaining -= load;
                is_first = false;
            }
        }

        Ok(assignments)
    }

    fn find_slot(
        &self,
        point: &LoadingPoint,
        accepted: &[(usize, TimeWindow)],
        desired: Timestamp,
        duration: Duration,
    ) -> Option<(usize, Timestamp)> {
        let start = self.world.start;
        let slice_length = self.policy.slice_length;
        let first_slice = slice_index(desired, start, slice_length);

        let mut candidates = std::iter::once(desired)
            .chain(point.bookings.iter().map(|booking| booking.window.end))
            .chain(accepted.iter().map(|(_, window)| window.end))
            .chain((1..=SLOT_HORIZON_SLICES).map(|offset| slice_window(first_slice + offset, start, slice_length).start))
            .filter(|time| *time >= desired)
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| compare_floats(*a, *b));
        candidates.dedup_by(|a, b| (*a - *b).abs() < EPSILON);

        (0..point.sidings)
            .filter_map(|siding| {
                candidates
                    .iter()
                    .find(|&&time| {
                        let loading = TimeWindow::new(time, time + duration);
                        is_siding_free(point, accepted, siding, &loading)
                            && fits_slice_capacity(point, accepted, &loading, start, slice_length)
                    })
                    .map(|&time| (siding, time))
            })
            .min_by(|(a_siding, a_time), (b_siding, b_time)| {
                compare_floats(*a_time, *b_time).then_with(|| a_siding.cmp(b_siding))
            })
    }
}

fn count_wagons(assignments: &[Assignment]) -> usize {
    let mut wagons = assignments.iter().map(|assignment| assignment.wagon).collect::<Vec<_>>();
    wagons.sort_unstable();
    wagons.dedup();

    wagons.len()
}

fn residual_capacities(world: &WorldState, assignments: &[Assignment]) -> Vec<(usize, Float)> {
    assignments.iter().fold(Vec::<(usize, Float)>::new(), |mut acc, assignment| {
        match acc.iter_mut().find(|(wagon, _)| *wagon == assignment.wagon) {
            Some((_, residual)) => *residual -= assignment.load,
            None => acc.push((assignment.wagon, world.wagons[assignment.wagon].capacity - assignment.load)),
        }
        acc
    })
}
