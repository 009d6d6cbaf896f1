//! Population based multi-objective search in the NSGA-II manner.

#[cfg(test)]
#[path = "../../tests/unit/solver/evolution_test.rs"]
mod evolution_test;

use super::exact::SearchOutcome;
use super::objectives::{RakeMultiObjective, create_candidate, dedup_candidates, select_front};
use super::operators::{Genome, Mutator};
use super::telemetry::Telemetry;
use crate::algorithms::nsga2::select_and_rank;
use crate::construction::decoder::Decoder;
use crate::models::solution::Candidate;
use crate::utils::{Environment, Float, Timer, compare_floats, parallel_into_collect};
use rustc_hash::FxHashSet;
use std::cmp::Ordering;

struct RankedMember {
    rank: usize,
    crowding: Float,
}

/// Runs the evolutionary search starting from seeds. Variation is generated sequentially from the
/// environment random source, decoding and evaluation of offspring run in parallel. Infeasible
/// offspring are discarded. Terminates after max generations, max time or when quota is reached.
pub fn solve_heuristic(
    decoder: &Decoder,
    environment: &Environment,
    seeds: Vec<Candidate>,
    telemetry: &mut Telemetry,
) -> SearchOutcome {
    let world = decoder.world();
    let policy = decoder.policy();
    let config = &policy.evolution;
    let objective = RakeMultiObjective::default();
    let mutator = Mutator::new(world, policy, environment.random.as_ref());
    let timer = Timer::start();

    let mut population = dedup_candidates(seeds.clone());
    let mut known = population.iter().map(|candidate| Genome::from(candidate.solution.as_ref())).collect::<FxHashSet<_>>();

    let mut budget_exceeded = false;
    let mut generation = 0;

    while generation < config.max_generations && !population.is_empty() {
        let is_time_over = config.max_time.is_some_and(|max_time| timer.elapsed_secs_as_float() > max_time);
        if is_time_over || environment.is_quota_reached() {
            budget_exceeded = true;
            break;
        }

        let ranking = rank_population(&population, &objective);

        let genomes = (0..config.offspring_size)
            .filter_map(|_| {
                let first = &population[tournament(&ranking, environment)];
                let first = Genome::from(first.solution.as_ref());

                let parent = if environment.random.is_hit(config.crossover_probability) {
                    let second = &population[tournament(&ranking, environment)];
                    mutator.crossover(&first, &Genome::from(second.solution.as_ref())).unwrap_or(first)
                } else {
                    first
                };

                mutator.mutate(&parent, mutator.pick())
            })
            .filter(|genome| known.insert(genome.clone()))
            .collect::<Vec<_>>();

        let generated = genomes.len();
        let offspring = environment.parallelism.execute(|| {
            parallel_into_collect(genomes, |genome| {
                decoder
                    .decode(&genome.drafts, &genome.deferred)
                    .ok()
                    .map(|solution| create_candidate(solution, world, policy))
            })
        });
        let offspring = offspring.into_iter().flatten().collect::<Vec<_>>();
        let discarded = generated - offspring.len();

        let mut merged = population;
        merged.extend(offspring);
        let merged = dedup_candidates(merged);

        population = select_and_rank(merged.as_slice(), config.population_size, &objective)
            .into_iter()
            .map(|assigned| assigned.solution.clone())
            .collect();

        generation += 1;

        let front = select_front(population.clone());
        telemetry.on_generation(generation, &front, generated, discarded);
    }

    population.extend(seeds);

    SearchOutcome { front: select_front(population), budget_exceeded }
}

fn rank_population(population: &[Candidate], objective: &RakeMultiObjective) -> Vec<RankedMember> {
    let mut ranking =
        population.iter().map(|_| RankedMember { rank: usize::MAX, crowding: 0. }).collect::<Vec<_>>();

    select_and_rank(population, population.len(), objective).into_iter().for_each(|assigned| {
        ranking[assigned.index] = RankedMember { rank: assigned.rank, crowding: assigned.crowding_distance };
    });

    ranking
}

/// Binary tournament: lower rank wins, then bigger crowding distance, then lower index.
fn tournament(ranking: &[RankedMember], environment: &Environment) -> usize {
    let last = ranking.len() as i32 - 1;
    let a = environment.random.uniform_int(0, last) as usize;
    let b = environment.random.uniform_int(0, last) as usize;

    let order = ranking[a]
        .rank
        .cmp(&ranking[b].rank)
        .then_with(|| compare_floats(ranking[b].crowding, ranking[a].crowding))
        .then_with(|| a.cmp(&b));

    if order == Ordering::Greater { b } else { a }
}
