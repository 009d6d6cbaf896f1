#[cfg(test)]
#[path = "../../../tests/unit/models/problem/snapshot_test.rs"]
mod snapshot_test;

use super::*;
use crate::models::common::Timestamp;
use crate::models::{IntegrityIssue, PlanningError};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

/// Maximum amount of alternative route chains kept for each plant and destination pair.
pub const MAX_ROUTE_ALTERNATIVES: usize = 5;

/// An immutable snapshot of the world used by one planning cycle.
///
/// All planning entities refer to orders, wagons, loading points and routes by their index in
/// the snapshot, so a snapshot must never be changed once a cycle has started. Use
/// [`WorldState::next_version`] to derive a new snapshot instead.
#[derive(Clone, Debug)]
pub struct WorldState {
    /// A planning start time.
    pub start: Timestamp,
    /// Snapshot version, grows with every commit.
    pub version: usize,
    /// Pending orders.
    pub orders: Vec<Arc<Order>>,
    /// Wagon pool.
    pub wagons: Vec<WagonUnit>,
    /// Loading points with their calendars.
    pub loading_points: Vec<LoadingPoint>,
    /// Route network.
    pub network: Arc<RouteNetwork>,
    /// Material catalog.
    pub materials: Arc<FxHashMap<String, MaterialSpec>>,

    routes: Vec<RouteChain>,
    lanes: FxHashMap<(String, String), Vec<usize>>,
    plant_points: FxHashMap<String, Vec<usize>>,
}

impl WorldState {
    /// Creates a new snapshot after checking its data integrity.
    pub fn new(
        start: Timestamp,
        orders: Vec<Arc<Order>>,
        wagons: Vec<WagonUnit>,
        loading_points: Vec<LoadingPoint>,
        segments: Vec<RouteSegment>,
        materials: Vec<MaterialSpec>,
    ) -> Result<Self, PlanningError> {
        let mut issues = Vec::new();

        check_segments(&segments, &mut issues);
        let network = Arc::new(RouteNetwork::new(segments));

        let mut catalog = FxHashMap::default();
        materials.into_iter().for_each(|spec| {
            if spec.wagon_types.is_empty() {
                issues.push(IntegrityIssue::new("material", &spec.material, "no allowed wagon types"));
            }
            if catalog.insert(spec.material.clone(), spec.clone()).is_some() {
                issues.push(IntegrityIssue::new("material", &spec.material, "duplicate id"));
            }
        });

        Self::create(start, 0, orders, wagons, loading_points, network, Arc::new(catalog), issues)
    }

    /// Creates the next version of the snapshot with changed mutable entities.
    pub fn next_version(
        &self,
        orders: Vec<Arc<Order>>,
        wagons: Vec<WagonUnit>,
        loading_points: Vec<LoadingPoint>,
    ) -> Result<Self, PlanningError> {
        Self::create(
            self.start,
            self.version + 1,
            orders,
            wagons,
            loading_points,
            self.network.clone(),
            self.materials.clone(),
            Vec::new(),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn create(
        start: Timestamp,
        version: usize,
        orders: Vec<Arc<Order>>,
        wagons: Vec<WagonUnit>,
        loading_points: Vec<LoadingPoint>,
        network: Arc<RouteNetwork>,
        materials: Arc<FxHashMap<String, MaterialSpec>>,
        mut issues: Vec<IntegrityIssue>,
    ) -> Result<Self, PlanningError> {
        if !start.is_finite() {
            issues.push(IntegrityIssue::new("snapshot", "start", "start time is not finite"));
        }

        check_wagons(&wagons, &mut issues);
        check_loading_points(&loading_points, &mut issues);

        let mut plant_points: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        loading_points.iter().enumerate().for_each(|(idx, point)| {
            plant_points.entry(point.plant.clone()).or_default().push(idx);
        });

        let mut routes = Vec::new();
        let mut lanes: FxHashMap<(String, String), Vec<usize>> = FxHashMap::default();
        let mut ids = FxHashSet::default();

        orders.iter().for_each(|order| {
            if !ids.insert(order.id.as_str()) {
                issues.push(IntegrityIssue::new("order", &order.id, "duplicate id"));
            }
            if !order.quantity.is_finite() || order.quantity <= 0. {
                issues.push(IntegrityIssue::new("order", &order.id, "quantity must be positive"));
            }
            if !order.window.is_valid() {
                issues.push(IntegrityIssue::new("order", &order.id, "delivery window is inverted"));
            }
            if !materials.contains_key(&order.material) {
                issues.push(IntegrityIssue::new("order", &order.id, format!("unknown material '{}'", order.material)));
            }
            if !plant_points.contains_key(&order.plant) {
                issues.push(IntegrityIssue::new("order", &order.id, format!("no loading point at plant '{}'", order.plant)));
            }

            let key = (order.plant.clone(), order.destination.clone());
            if !lanes.contains_key(&key) {
                let chains = network.paths(&order.plant, &order.destination, MAX_ROUTE_ALTERNATIVES);
                let indices = (routes.len()..routes.len() + chains.len()).collect::<Vec<_>>();
                routes.extend(chains);
                lanes.insert(key.clone(), indices);
            }

            if lanes.get(&key).is_none_or(|indices| indices.is_empty()) {
                issues.push(IntegrityIssue::new(
                    "order",
                    &order.id,
                    format!("destination '{}' is unreachable from plant '{}'", order.destination, order.plant),
                ));
            }
        });

        if !issues.is_empty() {
            return Err(PlanningError::DataIntegrity(issues));
        }

        Ok(Self { start, version, orders, wagons, loading_points, network, materials, routes, lanes, plant_points })
    }

    /// Returns route chain by its index.
    pub fn route(&self, index: usize) -> &RouteChain {
        &self.routes[index]
    }

    /// Returns amount of route chains known to the snapshot.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns indices of route chains from the plant to the destination sorted by transit time.
    pub fn lanes(&self, plant: &str, destination: &str) -> &[usize] {
        self.lanes.get(&(plant.to_string(), destination.to_string())).map_or(&[], |indices| indices.as_slice())
    }

    /// Returns indices of loading points located at the plant.
    pub fn loading_points_at(&self, plant: &str) -> &[usize] {
        self.plant_points.get(plant).map_or(&[], |indices| indices.as_slice())
    }

    /// Returns material specification of the order.
    pub fn material(&self, order: &Order) -> Option<&MaterialSpec> {
        self.materials.get(&order.material)
    }

    /// Returns order index by its id.
    pub fn order_index(&self, order_id: &str) -> Option<usize> {
        self.orders.iter().position(|order| order.id == order_id)
    }

    /// Returns wagon index by its id.
    pub fn wagon_index(&self, wagon_id: &str) -> Option<usize> {
        self.wagons.iter().position(|wagon| wagon.id == wagon_id)
    }

    /// Returns (loading point, route) options for the order limited by `route_limit` alternative routes.
    pub fn options(&self, order_idx: usize, route_limit: usize) -> Vec<(usize, usize)> {
        let order = &self.orders[order_idx];
        let routes = self.lanes(&order.plant, &order.destination);

        self.loading_points_at(&order.plant)
            .iter()
            .flat_map(|&point| routes.iter().take(route_limit.max(1)).map(move |&route| (point, route)))
            .collect()
    }

    /// Returns indices of available wagons at the given plant which can carry the order.
    pub fn compatible_wagons<'a>(&'a self, order_idx: usize, plant: &'a str) -> impl Iterator<Item = usize> + 'a {
        let order = self.orders[order_idx].as_ref();
        let material = self.material(order);

        self.wagons.iter().enumerate().filter_map(move |(idx, wagon)| {
            let compatible = material.is_some_and(|spec| spec.allows_wagon(order, &wagon.wagon_type));
            (compatible && wagon.is_available() && wagon.location == plant).then_some(idx)
        })
    }
}

fn check_wagons(wagons: &[WagonUnit], issues: &mut Vec<IntegrityIssue>) {
    let mut ids = FxHashSet::default();
    wagons.iter().for_each(|wagon| {
        if !ids.insert(wagon.id.as_str()) {
            issues.push(IntegrityIssue::new("wagon", &wagon.id, "duplicate id"));
        }
        if !wagon.capacity.is_finite() || wagon.capacity <= 0. {
            issues.push(IntegrityIssue::new("wagon", &wagon.id, "capacity must be positive"));
        }
        if !wagon.availability.is_valid() {
            issues.push(IntegrityIssue::new("wagon", &wagon.id, "availability window is inverted"));
        }
        if wagon.profile.tare < 0. || wagon.profile.height < 0. {
            issues.push(IntegrityIssue::new("wagon", &wagon.id, "physical profile has negative values"));
        }
    });
}

fn check_loading_points(points: &[LoadingPoint], issues: &mut Vec<IntegrityIssue>) {
    let mut ids = FxHashSet::default();
    points.iter().for_each(|point| {
        if !ids.insert(point.id.as_str()) {
            issues.push(IntegrityIssue::new("loading point", &point.id, "duplicate id"));
        }
        if !point.throughput.is_finite() || point.throughput <= 0. {
            issues.push(IntegrityIssue::new("loading point", &point.id, "throughput must be positive"));
        }
        if point.sidings == 0 {
            issues.push(IntegrityIssue::new("loading point", &point.id, "at least one siding is required"));
        }
        if point.slice_capacity <= 0. || point.free_time < 0. {
            issues.push(IntegrityIssue::new("loading point", &point.id, "slice capacity or free time is invalid"));
        }
        point.bookings.iter().for_each(|booking| {
            if booking.siding >= point.sidings || !booking.window.is_valid() {
                issues.push(IntegrityIssue::new(
                    "loading point",
                    &point.id,
                    format!("invalid booking '{}'", booking.reference),
                ));
            }
        });
        point.bookings.iter().enumerate().for_each(|(idx, booking)| {
            point
                .bookings
                .iter()
                .skip(idx + 1)
                .filter(|other| other.siding == booking.siding && other.window.overlaps(&booking.window))
                .for_each(|other| {
                    let message =
                        format!("bookings '{}' and '{}' overlap on siding {}", booking.reference, other.reference, booking.siding);
                    issues.push(IntegrityIssue::new("loading point", &point.id, message));
                });
        });
    });
}

fn check_segments(segments: &[RouteSegment], issues: &mut Vec<IntegrityIssue>) {
    segments.iter().for_each(|segment| {
        let id = format!("{}-{}", segment.origin, segment.destination);
        if segment.origin == segment.destination {
            issues.push(IntegrityIssue::new("segment", &id, "origin and destination are the same"));
        }
        if !segment.distance.is_finite() || segment.distance < 0. || segment.transit_time < 0. {
            issues.push(IntegrityIssue::new("segment", &id, "distance and transit time must be non-negative"));
        }
        if !(0. ..=1.).contains(&segment.congestion_risk) {
            issues.push(IntegrityIssue::new("segment", &id, "congestion risk must be in [0, 1]"));
        }
    });
}
