//! Exhaustive branch and bound search used for small instances.

#[cfg(test)]
#[path = "../../tests/unit/solver/exact_test.rs"]
mod exact_test;

use super::objectives::{create_candidate, select_front};
use super::telemetry::Telemetry;
use crate::construction::constraints::{ConstraintKind, Occupancy};
use crate::construction::decoder::Decoder;
use crate::construction::seeds::{SeedOrdering, sort_orders};
use crate::models::solution::{Candidate, RakeDraft};
use crate::models::{PlanningError, UnsatisfiableOrder};
use crate::utils::{Environment, Float, Timer};
use rustc_hash::FxHashMap;

/// A result of a search run.
pub struct SearchOutcome {
    /// Non-dominated candidates.
    pub front: Vec<Candidate>,
    /// True if search was stopped by time, quota or node limit.
    pub budget_exceeded: bool,
}

struct GroupStatus {
    options: Vec<(usize, usize)>,
    is_dead: bool,
}

struct ExactSearch<'a> {
    decoder: &'a Decoder<'a>,
    environment: &'a Environment,
    sequence: Vec<usize>,
    node_limit: usize,
    max_time: Option<Float>,
    timer: Timer,
    groups_cache: FxHashMap<Vec<usize>, GroupStatus>,
    archive: Vec<Candidate>,
    best_deferred: usize,
    leaves: usize,
    discarded: usize,
    depth: usize,
    budget_exceeded: bool,
}

/// Enumerates assignments of every order to a composition or to the deferred set, loading point
/// and route options of every composition, and returns all non-dominated complete solutions found.
/// Seeds bound the search: a branch is pruned once it defers more orders than the best known solution.
pub fn solve_exact(
    decoder: &Decoder,
    environment: &Environment,
    seeds: Vec<Candidate>,
    telemetry: &mut Telemetry,
) -> Result<SearchOutcome, PlanningError> {
    let world = decoder.world();
    let policy = decoder.policy();

    let best_deferred = seeds.iter().map(|seed| seed.deferred_count()).min().unwrap_or(world.orders.len());

    let mut search = ExactSearch {
        decoder,
        environment,
        sequence: sort_orders(decoder, SeedOrdering::Priority, None),
        node_limit: policy.exact_node_limit.max(1),
        max_time: policy.evolution.max_time,
        timer: Timer::start(),
        groups_cache: FxHashMap::default(),
        archive: seeds,
        best_deferred,
        leaves: 0,
        discarded: 0,
        depth: 0,
        budget_exceeded: false,
    };

    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut deferred: Vec<usize> = Vec::new();
    search.branch(0, &mut groups, &mut deferred);

    let best_deferred = search.best_deferred;
    let archive = std::mem::take(&mut search.archive)
        .into_iter()
        .filter(|candidate| candidate.deferred_count() == best_deferred)
        .collect::<Vec<_>>();
    let front = select_front(archive);

    telemetry.on_generation(search.depth, &front, search.leaves, search.discarded);

    let is_nothing_dispatched = !world.orders.is_empty() && best_deferred == world.orders.len();
    if policy.require_dispatch && is_nothing_dispatched && !search.budget_exceeded {
        let occupancy = Occupancy::default();
        let orders = (0..world.orders.len())
            .map(|order| UnsatisfiableOrder {
                order_id: world.orders[order].id.clone(),
                constraints: decoder.diagnose(order, &occupancy).violations.into_iter().collect::<Vec<ConstraintKind>>(),
            })
            .collect();

        return Err(PlanningError::InfeasibleInstance(orders));
    }

    Ok(SearchOutcome { front, budget_exceeded: search.budget_exceeded })
}

impl ExactSearch<'_> {
    fn branch(&mut self, position: usize, groups: &mut Vec<Vec<usize>>, deferred: &mut Vec<usize>) {
        if self.budget_exceeded || deferred.len() > self.best_deferred {
            return;
        }

        if self.is_budget_reached() {
            self.budget_exceeded = true;
            return;
        }

        self.depth = self.depth.max(position);

        let Some(&order) = self.sequence.get(position) else {
            self.evaluate_leaf(groups, deferred);
            return;
        };

        for group_idx in 0..groups.len() {
            groups[group_idx].push(order);
            if !self.group_status(&groups[group_idx]).is_dead {
                self.branch(position + 1, groups, deferred);
            }
            groups[group_idx].pop();
        }

        groups.push(vec![order]);
        if !self.group_status(&[order]).is_dead {
            self.branch(position + 1, groups, deferred);
        }
        groups.pop();

        deferred.push(order);
        self.branch(position + 1, groups, deferred);
        deferred.pop();
    }

    fn evaluate_leaf(&mut self, groups: &[Vec<usize>], deferred: &[usize]) {
        let options = groups.iter().map(|group| self.group_status(group).options.clone()).collect::<Vec<_>>();
        if options.iter().any(|group_options| group_options.is_empty()) {
            return;
        }

        let mut choice = vec![0_usize; groups.len()];
        loop {
            if self.is_budget_reached() {
                self.budget_exceeded = true;
                return;
            }

            let drafts = groups
                .iter()
                .zip(choice.iter())
                .zip(options.iter())
                .map(|((group, &option), group_options)| {
                    let (loading_point, route) = group_options[option];
                    RakeDraft { loading_point, route, orders: group.clone() }
                })
                .collect::<Vec<_>>();

            self.leaves += 1;
            match self.decoder.decode(&drafts, deferred) {
                Ok(solution) => {
                    let candidate = create_candidate(solution, self.decoder.world(), self.decoder.policy());
                    if candidate.deferred_count() < self.best_deferred {
                        self.best_deferred = candidate.deferred_count();
                        let best_deferred = self.best_deferred;
                        self.archive.retain(|other| other.deferred_count() == best_deferred);
                    }
                    self.archive.push(candidate);
                }
                Err(_) => self.discarded += 1,
            }

            // advance mixed radix counter over option choices
            let Some(idx) = (0..choice.len()).rev().find(|&idx| choice[idx] + 1 < options[idx].len()) else {
                return;
            };
            choice[idx] += 1;
            choice.iter_mut().skip(idx + 1).for_each(|value| *value = 0);
        }
    }

    fn is_budget_reached(&self) -> bool {
        let is_time_over = self.max_time.is_some_and(|max_time| self.timer.elapsed_secs_as_float() >= max_time);

        self.leaves >= self.node_limit || is_time_over || self.environment.is_quota_reached()
    }

    fn group_status(&mut self, group: &[usize]) -> &GroupStatus {
        let mut key = group.to_vec();
        key.sort_unstable();

        let decoder = self.decoder;
        self.groups_cache.entry(key).or_insert_with(|| {
            let world = decoder.world();
            let policy = decoder.policy();
            let occupancy = Occupancy::default();

            let head = group[0];
            let results = world
                .options(head, policy.route_alternatives)
                .into_iter()
                .map(|(loading_point, route)| {
                    let draft = RakeDraft { loading_point, route, orders: group.to_vec() };
                    ((loading_point, route), decoder.compose(&draft, &occupancy))
                })
                .collect::<Vec<_>>();

            let options = results.iter().filter(|(_, result)| result.is_ok()).map(|(option, _)| *option).collect();
            let is_dead = results.iter().all(|(_, result)| {
                result.as_ref().is_err_and(|violations| violations.iter().any(|kind| *kind != ConstraintKind::RakeLength))
            });

            GroupStatus { options, is_dead }
        })
    }
}
