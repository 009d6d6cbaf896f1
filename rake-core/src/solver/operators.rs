//! Variation operators of the evolutionary search. Operators work on genomes: composition drafts
//! and the deferred set. Every produced genome keeps the backlog partition intact.

#[cfg(test)]
#[path = "../../tests/unit/solver/operators_test.rs"]
mod operators_test;

use crate::models::PlanningPolicy;
use crate::models::problem::WorldState;
use crate::models::solution::{RakeDraft, Solution};
use crate::utils::Random;

/// A genotype of a solution.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Genome {
    /// Composition drafts in booking sequence.
    pub drafts: Vec<RakeDraft>,
    /// Deferred orders.
    pub deferred: Vec<usize>,
}

impl From<&Solution> for Genome {
    fn from(solution: &Solution) -> Self {
        Self { drafts: solution.drafts(), deferred: solution.deferred_orders() }
    }
}

impl Genome {
    fn normalize(mut self) -> Self {
        self.drafts.retain(|draft| !draft.orders.is_empty());
        self.deferred.sort_unstable();
        self
    }

    fn remove_order(&mut self, order: usize) {
        self.drafts.iter_mut().for_each(|draft| draft.orders.retain(|&other| other != order));
        self.deferred.retain(|&other| other != order);
    }

    fn placed_orders(&self) -> Vec<usize> {
        self.drafts.iter().flat_map(|draft| draft.orders.iter().copied()).chain(self.deferred.iter().copied()).collect()
    }
}

/// A kind of mutation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mutation {
    /// Moves one order into another composition, a new composition or the deferred set.
    MoveOrder,
    /// Swaps two orders of different compositions or of a composition and the deferred set.
    SwapOrders,
    /// Splits a composition into two.
    SplitComposition,
    /// Merges two compositions with the same plant and destination.
    MergeCompositions,
    /// Changes loading point and route of a composition.
    ChangeLane,
}

impl Mutation {
    /// All mutations with their selection weights.
    pub const WEIGHTED: [(Mutation, usize); 5] = [
        (Mutation::MoveOrder, 4),
        (Mutation::SwapOrders, 2),
        (Mutation::SplitComposition, 1),
        (Mutation::MergeCompositions, 2),
        (Mutation::ChangeLane, 1),
    ];
}

/// Applies mutations to genomes.
pub struct Mutator<'a> {
    world: &'a WorldState,
    policy: &'a PlanningPolicy,
    random: &'a (dyn Random + Send + Sync),
}

impl<'a> Mutator<'a> {
    /// Creates a new instance of `Mutator`.
    pub fn new(world: &'a WorldState, policy: &'a PlanningPolicy, random: &'a (dyn Random + Send + Sync)) -> Self {
        Self { world, policy, random }
    }

    /// Picks a mutation using weights.
    pub fn pick(&self) -> Mutation {
        let weights = Mutation::WEIGHTED.iter().map(|(_, weight)| *weight).collect::<Vec<_>>();
        Mutation::WEIGHTED[self.random.weighted(weights.as_slice())].0
    }

    /// Applies the mutation, returns `None` when it is not applicable to the genome.
    pub fn mutate(&self, genome: &Genome, mutation: Mutation) -> Option<Genome> {
        let child = match mutation {
            Mutation::MoveOrder => self.move_order(genome),
            Mutation::SwapOrders => self.swap_orders(genome),
            Mutation::SplitComposition => self.split_composition(genome),
            Mutation::MergeCompositions => self.merge_compositions(genome),
            Mutation::ChangeLane => self.change_lane(genome),
        }?;

        debug_assert!({
            let mut before = genome.placed_orders();
            let mut after = child.placed_orders();
            before.sort_unstable();
            after.sort_unstable();
            before == after
        });

        Some(child)
    }

    /// Swaps a whole composition of `donor` into `recipient`: its orders are removed from the
    /// recipient's own compositions or deferred set first.
    pub fn crossover(&self, recipient: &Genome, donor: &Genome) -> Option<Genome> {
        let draft = donor.drafts.get(self.index(donor.drafts.len())?)?.clone();

        let mut child = recipient.clone();
        draft.orders.iter().for_each(|&order| child.remove_order(order));

        let position = self.random.uniform_int(0, child.drafts.len() as i32) as usize;
        child.drafts.insert(position.min(child.drafts.len()), draft);

        let child = child.normalize();
        (child != *recipient).then_some(child)
    }

    fn move_order(&self, genome: &Genome) -> Option<Genome> {
        let orders = genome.placed_orders();
        let order = orders[self.index(orders.len())?];
        let is_deferred = genome.deferred.contains(&order);

        let mut child = genome.clone();
        child.remove_order(order);

        let targets = self.compatible_drafts(&child, order);
        // 0: new composition, 1: deferred set (only for dispatched orders), others: existing compositions
        let extra = if is_deferred { 1 } else { 2 };
        let target = self.random.uniform_int(0, (targets.len() + extra) as i32 - 1) as usize;

        match target {
            0 => child.drafts.push(self.new_draft(order)?),
            1 if !is_deferred => child.deferred.push(order),
            _ => {
                let draft_idx = targets[target - extra];
                let orders = &mut child.drafts[draft_idx].orders;
                let position = self.random.uniform_int(0, orders.len() as i32) as usize;
                orders.insert(position.min(orders.len()), order);
            }
        }

        let child = child.normalize();
        (child != *genome).then_some(child)
    }

    fn swap_orders(&self, genome: &Genome) -> Option<Genome> {
        let dispatched = genome
            .drafts
            .iter()
            .enumerate()
            .flat_map(|(draft_idx, draft)| draft.orders.iter().enumerate().map(move |(pos, _)| (draft_idx, pos)))
            .collect::<Vec<_>>();
        let (draft_idx, pos) = dispatched[self.index(dispatched.len())?];
        let order = genome.drafts[draft_idx].orders[pos];

        let order_of = |other: usize| &self.world.orders[other];
        let is_same_lane = |other: usize| {
            order_of(other).plant == order_of(order).plant && order_of(other).destination == order_of(order).destination
        };

        // candidates: orders of other compositions on the same lane or deferred orders
        let others = genome
            .drafts
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != draft_idx)
            .flat_map(|(idx, draft)| draft.orders.iter().enumerate().map(move |(other_pos, &other)| (Some((idx, other_pos)), other)))
            .chain(genome.deferred.iter().map(|&other| (None, other)))
            .filter(|(_, other)| is_same_lane(*other))
            .collect::<Vec<_>>();
        let (other_place, other) = others[self.index(others.len())?];

        let mut child = genome.clone();
        child.drafts[draft_idx].orders[pos] = other;
        match other_place {
            Some((other_idx, other_pos)) => child.drafts[other_idx].orders[other_pos] = order,
            None => {
                child.deferred.retain(|&deferred| deferred != other);
                child.deferred.push(order);
            }
        }

        Some(child.normalize())
    }

    fn split_composition(&self, genome: &Genome) -> Option<Genome> {
        let candidates =
            genome.drafts.iter().enumerate().filter(|(_, draft)| draft.orders.len() > 1).map(|(idx, _)| idx).collect::<Vec<_>>();
        let draft_idx = candidates[self.index(candidates.len())?];

        let mut child = genome.clone();
        let draft = &mut child.drafts[draft_idx];
        let at = self.random.uniform_int(1, draft.orders.len() as i32 - 1) as usize;
        let tail = draft.orders.split_off(at);
        let split = RakeDraft { loading_point: draft.loading_point, route: draft.route, orders: tail };
        child.drafts.insert(draft_idx + 1, split);

        Some(child.normalize())
    }

    fn merge_compositions(&self, genome: &Genome) -> Option<Genome> {
        let pairs = (0..genome.drafts.len())
            .flat_map(|a| (a + 1..genome.drafts.len()).map(move |b| (a, b)))
            .filter(|&(a, b)| {
                let (a, b) = (&genome.drafts[a], &genome.drafts[b]);
                let plant = |draft: &RakeDraft| self.world.loading_points[draft.loading_point].plant.as_str();
                let destination = |draft: &RakeDraft| self.world.route(draft.route).destination.as_str();

                plant(a) == plant(b) && destination(a) == destination(b)
            })
            .collect::<Vec<_>>();
        let (a, b) = pairs[self.index(pairs.len())?];

        let mut child = genome.clone();
        let merged = std::mem::take(&mut child.drafts[b].orders);
        child.drafts[a].orders.extend(merged);

        Some(child.normalize())
    }

    fn change_lane(&self, genome: &Genome) -> Option<Genome> {
        let draft_idx = self.index(genome.drafts.len())?;
        let draft = &genome.drafts[draft_idx];

        let options = self
            .world
            .options(draft.orders[0], self.policy.route_alternatives)
            .into_iter()
            .filter(|&(loading_point, route)| loading_point != draft.loading_point || route != draft.route)
            .collect::<Vec<_>>();
        let (loading_point, route) = options[self.index(options.len())?];

        let mut child = genome.clone();
        child.drafts[draft_idx].loading_point = loading_point;
        child.drafts[draft_idx].route = route;

        Some(child)
    }

    fn compatible_drafts(&self, genome: &Genome, order: usize) -> Vec<usize> {
        let order = &self.world.orders[order];

        genome
            .drafts
            .iter()
            .enumerate()
            .filter(|(_, draft)| {
                !draft.orders.is_empty()
                    && self.world.loading_points[draft.loading_point].plant == order.plant
                    && self.world.route(draft.route).destination == order.destination
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    fn new_draft(&self, order: usize) -> Option<RakeDraft> {
        let options = self.world.options(order, self.policy.route_alternatives);
        let (loading_point, route) = options[self.index(options.len())?];

        Some(RakeDraft { loading_point, route, orders: vec![order] })
    }

    fn index(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.random.uniform_int(0, len as i32 - 1) as usize)
    }
}
