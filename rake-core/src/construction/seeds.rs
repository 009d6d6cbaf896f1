//! Greedy constructive seeding and diversified seeds.

#[cfg(test)]
#[path = "../../tests/unit/construction/seeds_test.rs"]
mod seeds_test;

use super::constraints::*;
use super::decoder::Decoder;
use crate::models::solution::*;
use crate::utils::{Float, Random, compare_floats, shuffle_with};
use std::cmp::Ordering;

/// Specifies order sequence used to build a seed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeedOrdering {
    /// Priority tier desc, due date asc, quantity desc.
    Priority,
    /// Shortest lane distance first.
    CostFirst,
    /// Due date asc, priority tier desc.
    DueDateFirst,
    /// Largest quantity first.
    QuantityFirst,
    /// Random shuffle.
    Shuffled,
}

impl SeedOrdering {
    /// Seed orderings in the sequence they are generated.
    pub const ALL: [SeedOrdering; 5] = [
        SeedOrdering::Priority,
        SeedOrdering::CostFirst,
        SeedOrdering::DueDateFirst,
        SeedOrdering::QuantityFirst,
        SeedOrdering::Shuffled,
    ];
}

/// Creates a baseline solution growing compositions greedily in priority order.
pub fn create_greedy_seed(decoder: &Decoder) -> Solution {
    let orders = sort_orders(decoder, SeedOrdering::Priority, None);
    build_seed(decoder, orders)
}

/// Creates up to `max_seeds` structurally different solutions, the greedy one is always the first.
/// A random shuffle seed is added only when a random source is supplied.
pub fn create_seeds(decoder: &Decoder, max_seeds: usize, random: Option<&(dyn Random + Send + Sync)>) -> Vec<Solution> {
    let mut seeds: Vec<Solution> = Vec::new();

    for ordering in SeedOrdering::ALL {
        if seeds.len() >= max_seeds.max(1) {
            break;
        }

        if ordering == SeedOrdering::Shuffled && random.is_none() {
            continue;
        }

        let seed = build_seed(decoder, sort_orders(decoder, ordering, random));
        if seeds.iter().all(|other| other.key() != seed.key() || other.deferred_orders() != seed.deferred_orders()) {
            seeds.push(seed);
        }
    }

    seeds
}

/// Returns order indices sorted by the given ordering.
pub fn sort_orders(
    decoder: &Decoder,
    ordering: SeedOrdering,
    random: Option<&(dyn Random + Send + Sync)>,
) -> Vec<usize> {
    let world = decoder.world();
    let mut orders = (0..world.orders.len()).collect::<Vec<_>>();

    let by_priority = |a: &usize, b: &usize| {
        let (a, b) = (&world.orders[*a], &world.orders[*b]);
        b.priority
            .cmp(&a.priority)
            .then_with(|| compare_floats(a.due(), b.due()))
            .then_with(|| compare_floats(b.quantity, a.quantity))
    };
    let lane_distance = |order: usize| {
        let order = &world.orders[order];
        world.lanes(&order.plant, &order.destination).iter().map(|&route| world.route(route).distance).fold(Float::MAX, Float::min)
    };

    match ordering {
        SeedOrdering::Priority => orders.sort_by(|a, b| by_priority(a, b).then_with(|| a.cmp(b))),
        SeedOrdering::CostFirst => orders.sort_by(|a, b| {
            compare_floats(lane_distance(*a), lane_distance(*b)).then_with(|| by_priority(a, b)).then_with(|| a.cmp(b))
        }),
        SeedOrdering::DueDateFirst => orders.sort_by(|a, b| {
            let (oa, ob) = (&world.orders[*a], &world.orders[*b]);
            compare_floats(oa.due(), ob.due()).then_with(|| ob.priority.cmp(&oa.priority)).then_with(|| a.cmp(b))
        }),
        SeedOrdering::QuantityFirst => orders.sort_by(|a, b| {
            let (oa, ob) = (&world.orders[*a], &world.orders[*b]);
            compare_floats(ob.quantity, oa.quantity).then_with(|| a.cmp(b))
        }),
        SeedOrdering::Shuffled => {
            if let Some(random) = random {
                shuffle_with(orders.as_mut_slice(), random);
            }
        }
    }

    orders
}

/// Builds a solution from orders in the given sequence growing one composition at a time.
pub fn build_seed(decoder: &Decoder, orders: Vec<usize>) -> Solution {
    let world = decoder.world();
    let policy = decoder.policy();

    let mut occupancy = Occupancy::default();
    let mut compositions: Vec<RakeComposition> = Vec::new();
    let mut deferred = Vec::new();
    let mut remaining = orders;

    while !remaining.is_empty() {
        let head = remaining.remove(0);

        let mut best: Option<(RakeComposition, Vec<usize>)> = None;

        for (loading_point, route) in world.options(head, policy.route_alternatives) {
            let (grown, included) = grow_composition(decoder, &occupancy, loading_point, route, head, &remaining);

            if let Some(composition) = grown {
                let is_better = best.as_ref().is_none_or(|(current, current_included)| {
                    included.len().cmp(&current_included.len()).then_with(|| {
                        compare_floats(current.arrival, composition.arrival)
                    }) == Ordering::Greater
                });

                if is_better {
                    best = Some((composition, included));
                }
            }
        }

        match best {
            Some((composition, included)) => {
                remaining.retain(|order| !included.contains(order));
                occupancy.accept(&composition);
                compositions.push(composition);
            }
            None => deferred.push(head),
        }
    }

    deferred.sort_unstable();
    let deferred = deferred.into_iter().map(|order| decoder.diagnose(order, &occupancy)).collect();

    Solution { compositions, deferred }
}

/// Grows a composition starting from `head` by adding next orders which keep it feasible and do
/// not lower wagon utilization. While the composition is too short for the minimum rake length,
/// orders are added as long as rake length stays the only violation.
fn grow_composition(
    decoder: &Decoder,
    occupancy: &Occupancy,
    loading_point: usize,
    route: usize,
    head: usize,
    candidates: &[usize],
) -> (Option<RakeComposition>, Vec<usize>) {
    let world = decoder.world();
    let is_length_only = |violations: &ViolationSet| violations.len() == 1 && violations.contains(&ConstraintKind::RakeLength);

    let mut draft = RakeDraft { loading_point, route, orders: vec![head] };
    let mut current = decoder.compose(&draft, occupancy);

    if current.as_ref().is_err_and(|violations| !is_length_only(violations)) {
        return (None, vec![]);
    }

    let head_order = &world.orders[head];
    for &candidate in candidates {
        let order = &world.orders[candidate];
        if order.plant != head_order.plant || order.destination != head_order.destination {
            continue;
        }

        let mut next_draft = draft.clone();
        next_draft.orders.push(candidate);

        let next = decoder.compose(&next_draft, occupancy);
        let is_accepted = match (&current, &next) {
            (Ok(current), Ok(next)) => next.utilization(world) + EPSILON >= current.utilization(world),
            (Err(_), Ok(_)) => true,
            (Err(_), Err(violations)) => is_length_only(violations),
            (Ok(_), Err(_)) => false,
        };

        if is_accepted {
            draft = next_draft;
            current = next;
        }
    }

    match current {
        Ok(composition) => (Some(composition), draft.orders),
        Err(_) => (None, vec![]),
    }
}
