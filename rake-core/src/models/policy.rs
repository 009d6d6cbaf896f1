//! Planning policy: business rules and search settings of a planning cycle.

#[cfg(test)]
#[path = "../../tests/unit/models/policy_test.rs"]
mod policy_test;

use crate::models::common::{DAY, Duration};
use crate::models::problem::{Order, PriorityTier};
use crate::models::solution::ObjectiveTerm;
use crate::scenarios::ScenarioConfig;
use crate::utils::{Float, GenericResult};

/// Weights of objective terms used by weighted sum scalarization.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveWeights {
    /// Cost weight.
    pub cost: Float,
    /// Delay penalty weight.
    pub delay: Float,
    /// Utilization weight.
    pub utilization: Float,
    /// Demurrage weight.
    pub demurrage: Float,
}

impl ObjectiveWeights {
    /// Returns weight of the term.
    pub fn get(&self, term: ObjectiveTerm) -> Float {
        match term {
            ObjectiveTerm::Cost => self.cost,
            ObjectiveTerm::Delay => self.delay,
            ObjectiveTerm::Utilization => self.utilization,
            ObjectiveTerm::Demurrage => self.demurrage,
        }
    }
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self { cost: 1., delay: 1., utilization: 1., demurrage: 1. }
    }
}

/// Specifies how one solution is picked from the Pareto front.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SelectionPolicy {
    /// Minimizes weighted sum of front-normalized objectives.
    #[default]
    WeightedSum,
    /// Compares objectives one by one in the given order.
    Lexicographic {
        /// Objective precedence.
        order: Vec<ObjectiveTerm>,
        /// Solutions above the budget are considered only when no solution fits it.
        cost_budget: Option<Float>,
        /// Relative tolerance within which values are considered equal.
        tolerance: Float,
    },
    /// Minimizes weighted sum of worst-case percentile objectives.
    MinWorstCase,
}

/// A solve method.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SolveMethod {
    /// Picks exact or heuristic path by instance size.
    #[default]
    Auto,
    /// Exhaustive branch and bound.
    Exact,
    /// Population based evolutionary search.
    Heuristic,
    /// Greedy constructive seed only.
    Greedy,
}

/// Rake length limits in wagons.
#[derive(Clone, Debug, PartialEq)]
pub struct RakeLength {
    /// Minimum amount of wagons.
    pub min: usize,
    /// Maximum amount of wagons.
    pub max: usize,
}

impl Default for RakeLength {
    fn default() -> Self {
        Self { min: 1, max: 60 }
    }
}

/// Tariffs and rates used by objective evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Tariff {
    /// Freight cost per tonne and kilometre.
    pub per_tonne_km: Float,
    /// Fixed handling cost per composition.
    pub handling_cost: Float,
    /// Delay penalty per hour of late arrival.
    pub penalty_rate: Float,
    /// Demurrage per wagon per hour above free time.
    pub demurrage_rate: Float,
}

impl Default for Tariff {
    fn default() -> Self {
        Self { per_tonne_km: 1., handling_cost: 1000., penalty_rate: 500., demurrage_rate: 150. }
    }
}

/// Settings of the evolutionary search.
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionConfig {
    /// Population size.
    pub population_size: usize,
    /// Amount of offspring generated per generation.
    pub offspring_size: usize,
    /// Maximum amount of generations.
    pub max_generations: usize,
    /// Maximum search time in seconds.
    pub max_time: Option<Float>,
    /// Maximum amount of initial seeds, including the greedy one.
    pub seeds: usize,
    /// Probability to apply crossover before mutation.
    pub crossover_probability: Float,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 24,
            offspring_size: 24,
            max_generations: 200,
            max_time: None,
            seeds: 4,
            crossover_probability: 0.3,
        }
    }
}

/// Keeps all business rules and search settings of a planning cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanningPolicy {
    /// Objective weights.
    pub weights: ObjectiveWeights,
    /// Selection policy.
    pub selection: SelectionPolicy,
    /// Rake length limits.
    pub rake_length: RakeLength,
    /// Tariffs and rates.
    pub tariff: Tariff,
    /// Priority tiers whose orders may arrive late with delay penalty.
    pub soft_deadline_tiers: Vec<PriorityTier>,
    /// Whether several orders may share one wagon.
    pub wagon_sharing: bool,
    /// Length of a time slice used by loading point capacity.
    pub slice_length: Duration,
    /// Maximum amount of alternative routes considered per lane.
    pub route_alternatives: usize,
    /// Exact path is used when order count multiplied by wagon count does not exceed it.
    pub exact_threshold: usize,
    /// Solve method.
    pub method: SolveMethod,
    /// Maximum amount of leaf evaluations of the exact path.
    pub exact_node_limit: usize,
    /// Evolutionary search settings.
    pub evolution: EvolutionConfig,
    /// Scenario sampling settings.
    pub scenario: ScenarioConfig,
    /// When set, the exact path reports an error if no order can be dispatched.
    pub require_dispatch: bool,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        Self {
            weights: ObjectiveWeights::default(),
            selection: SelectionPolicy::default(),
            rake_length: RakeLength::default(),
            tariff: Tariff::default(),
            soft_deadline_tiers: Vec::new(),
            wagon_sharing: false,
            slice_length: DAY,
            route_alternatives: 3,
            exact_threshold: 64,
            method: SolveMethod::Auto,
            exact_node_limit: 200_000,
            evolution: EvolutionConfig::default(),
            scenario: ScenarioConfig::default(),
            require_dispatch: false,
        }
    }
}

impl PlanningPolicy {
    /// Sets rake length limits.
    pub fn with_rake_length(mut self, min: usize, max: usize) -> Self {
        self.rake_length = RakeLength { min, max };
        self
    }

    /// Sets objective weights.
    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets selection policy.
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Sets tariffs and rates.
    pub fn with_tariff(mut self, tariff: Tariff) -> Self {
        self.tariff = tariff;
        self
    }

    /// Sets priority tiers with soft deadlines.
    pub fn with_soft_deadline_tiers(mut self, tiers: Vec<PriorityTier>) -> Self {
        self.soft_deadline_tiers = tiers;
        self
    }

    /// Allows or disallows wagon sharing between orders.
    pub fn with_wagon_sharing(mut self, wagon_sharing: bool) -> Self {
        self.wagon_sharing = wagon_sharing;
        self
    }

    /// Sets solve method.
    pub fn with_method(mut self, method: SolveMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets evolution settings.
    pub fn with_evolution(mut self, evolution: EvolutionConfig) -> Self {
        self.evolution = evolution;
        self
    }

    /// Sets scenario settings.
    pub fn with_scenario(mut self, scenario: ScenarioConfig) -> Self {
        self.scenario = scenario;
        self
    }

    /// Sets a seed used by scenario sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.scenario.seed = seed;
        self
    }

    /// Returns true if the order may arrive after its latest delivery time.
    pub fn is_delay_tolerated(&self, order: &Order) -> bool {
        !order.hard_deadline && self.soft_deadline_tiers.contains(&order.priority)
    }

    /// Checks policy consistency.
    pub fn validate(&self) -> GenericResult<()> {
        let mut errors = Vec::new();

        if self.rake_length.min == 0 || self.rake_length.min > self.rake_length.max {
            errors.push(format!(
                "invalid rake length: min={}, max={}",
                self.rake_length.min, self.rake_length.max
            ));
        }

        let weights = [self.weights.cost, self.weights.delay, self.weights.utilization, self.weights.demurrage];
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.) {
            errors.push("objective weights must be non-negative".to_string());
        }

        let tariff = &self.tariff;
        let rates = [tariff.per_tonne_km, tariff.handling_cost, tariff.penalty_rate, tariff.demurrage_rate];
        if rates.iter().any(|rate| !rate.is_finite() || *rate < 0.) {
            errors.push("tariffs and rates must be non-negative".to_string());
        }

        if !self.slice_length.is_finite() || self.slice_length <= 0. {
            errors.push("slice length must be positive".to_string());
        }

        if self.evolution.population_size == 0 || self.evolution.seeds == 0 {
            errors.push("population size and seed count must be positive".to_string());
        }

        if !(0. ..=1.).contains(&self.evolution.crossover_probability) {
            errors.push("crossover probability must be in [0, 1]".to_string());
        }

        if let SelectionPolicy::Lexicographic { order, tolerance, .. } = &self.selection {
            if order.is_empty() || *tolerance < 0. {
                errors.push("lexicographic order must be non-empty with non-negative tolerance".to_string());
            }
        }

        if let Err(err) = self.scenario.validate() {
            errors.push(err.to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors.join(", ").into()) }
    }
}
