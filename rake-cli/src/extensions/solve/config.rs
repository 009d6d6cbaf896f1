//! Planning configuration.

#![allow(missing_docs)]

#[cfg(test)]
#[path = "../../../tests/unit/extensions/solve/config_test.rs"]
mod config_test;

use rake_core::prelude::*;
use rake_core::utils::Parallelism;
use serde::Deserialize;
use std::io::{BufReader, Read};
use std::sync::Arc;

/// A planning configuration. Every omitted setting keeps its default value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Specifies objective weights used by weighted sum scalarization.
    pub weights: Option<WeightsConfig>,
    /// Specifies how one plan is picked from the Pareto front.
    pub selection: Option<SelectionConfig>,
    /// Specifies rake formation rules.
    pub rake: Option<RakeConfig>,
    /// Specifies tariffs and rates.
    pub tariff: Option<TariffConfig>,
    /// Specifies search settings.
    pub search: Option<SearchConfig>,
    /// Specifies scenario sampling settings.
    pub scenario: Option<ScenarioSettings>,
    /// Specifies execution environment settings.
    pub environment: Option<EnvironmentConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WeightsConfig {
    pub cost: Option<f64>,
    pub delay: Option<f64>,
    pub utilization: Option<f64>,
    pub demurrage: Option<f64>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveConfig {
    Cost,
    Delay,
    Utilization,
    Demurrage,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum SelectionConfig {
    /// Minimizes weighted sum of front-normalized objectives.
    WeightedSum,

    /// Compares objectives one by one in the given order.
    #[serde(rename_all = "camelCase")]
    Lexicographic {
        /// Objective precedence.
        order: Vec<ObjectiveConfig>,
        /// Optional cost budget.
        cost_budget: Option<f64>,
        /// Relative tolerance within which values are considered equal. Default is 0.01.
        tolerance: Option<f64>,
    },

    /// Minimizes weighted sum of worst-case percentile objectives.
    MinWorstCase,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RakeConfig {
    /// Minimum amount of wagons in a rake.
    pub min_length: Option<usize>,
    /// Maximum amount of wagons in a rake.
    pub max_length: Option<usize>,
    /// Allows several orders to share one wagon.
    pub wagon_sharing: Option<bool>,
    /// Priority tiers whose orders may arrive late with delay penalty.
    pub soft_deadline_tiers: Option<Vec<u8>>,
    /// Length of loading point capacity slice in hours.
    pub slice_length: Option<f64>,
    /// Maximum amount of alternative routes per lane.
    pub route_alternatives: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffConfig {
    pub per_tonne_km: Option<f64>,
    pub handling_cost: Option<f64>,
    pub penalty_rate: Option<f64>,
    pub demurrage_rate: Option<f64>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MethodConfig {
    Auto,
    Exact,
    Heuristic,
    Greedy,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Solve method. Default is auto.
    pub method: Option<MethodConfig>,
    /// Exact path is used when order count multiplied by wagon count does not exceed it.
    pub exact_threshold: Option<usize>,
    /// Maximum amount of leaf evaluations of the exact path.
    pub exact_node_limit: Option<usize>,
    /// Maximum amount of generations.
    pub max_generations: Option<usize>,
    /// Maximum search time in seconds.
    pub max_time: Option<f64>,
    pub population_size: Option<usize>,
    pub offspring_size: Option<usize>,
    /// Maximum amount of initial seeds.
    pub seeds: Option<usize>,
    pub crossover_probability: Option<f64>,
    /// A seed which makes search and scenario sampling reproducible.
    pub seed: Option<u64>,
    /// When set, exact path fails if no order can be dispatched.
    pub require_dispatch: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum DistributionConfig {
    Fixed { value: f64 },
    Uniform { min: f64, max: f64 },
    #[serde(rename_all = "camelCase")]
    Normal { mean: f64, std_dev: f64 },
    LogNormal { mu: f64, sigma: f64 },
    Exponential { rate: f64 },
    Triangular { min: f64, mode: f64, max: f64 },
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSettings {
    /// Amount of samples, zero means nominal evaluation only.
    pub samples: Option<usize>,
    /// Percentile used for worst-case vector.
    pub percentile: Option<f64>,
    /// Extra loading duration in hours.
    pub loading_delay: Option<DistributionConfig>,
    /// Extra transit time in hours.
    pub transit_delay: Option<DistributionConfig>,
    /// Congestion factor.
    pub congestion: Option<DistributionConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    /// Amount of worker threads. Default is number of cpus.
    pub threads: Option<usize>,
    /// Enables logging into stdout.
    pub logging: Option<bool>,
}

impl Config {
    /// Returns search settings creating default ones if they are missing.
    pub fn search_mut(&mut self) -> &mut SearchConfig {
        self.search.get_or_insert_with(SearchConfig::default)
    }

    /// Returns environment settings creating default ones if they are missing.
    pub fn environment_mut(&mut self) -> &mut EnvironmentConfig {
        self.environment.get_or_insert_with(EnvironmentConfig::default)
    }
}

impl From<ObjectiveConfig> for ObjectiveTerm {
    fn from(objective: ObjectiveConfig) -> Self {
        match objective {
            ObjectiveConfig::Cost => ObjectiveTerm::Cost,
            ObjectiveConfig::Delay => ObjectiveTerm::Delay,
            ObjectiveConfig::Utilization => ObjectiveTerm::Utilization,
            ObjectiveConfig::Demurrage => ObjectiveTerm::Demurrage,
        }
    }
}

impl From<MethodConfig> for SolveMethod {
    fn from(method: MethodConfig) -> Self {
        match method {
            MethodConfig::Auto => SolveMethod::Auto,
            MethodConfig::Exact => SolveMethod::Exact,
            MethodConfig::Heuristic => SolveMethod::Heuristic,
            MethodConfig::Greedy => SolveMethod::Greedy,
        }
    }
}

impl From<&DistributionConfig> for Distribution {
    fn from(distribution: &DistributionConfig) -> Self {
        match *distribution {
            DistributionConfig::Fixed { value } => Distribution::Fixed(value),
            DistributionConfig::Uniform { min, max } => Distribution::Uniform { min, max },
            DistributionConfig::Normal { mean, std_dev } => Distribution::Normal { mean, std_dev },
            DistributionConfig::LogNormal { mu, sigma } => Distribution::LogNormal { mu, sigma },
            DistributionConfig::Exponential { rate } => Distribution::Exponential { rate },
            DistributionConfig::Triangular { min, mode, max } => Distribution::Triangular { min, mode, max },
        }
    }
}

/// Parses solve method from its name.
pub fn parse_method(name: &str) -> Result<MethodConfig, GenericError> {
    serde_json::from_value::<MethodConfig>(serde_json::Value::String(name.to_lowercase()))
        .map_err(|_| format!("unknown solve method: '{name}', expected one of: auto, exact, heuristic, greedy").into())
}

fn configure_weights(mut policy: PlanningPolicy, config: &WeightsConfig) -> PlanningPolicy {
    let defaults = policy.weights.clone();
    policy.weights = ObjectiveWeights {
        cost: config.cost.unwrap_or(defaults.cost),
        delay: config.delay.unwrap_or(defaults.delay),
        utilization: config.utilization.unwrap_or(defaults.utilization),
        demurrage: config.demurrage.unwrap_or(defaults.demurrage),
    };

    policy
}

fn configure_selection(policy: PlanningPolicy, config: &SelectionConfig) -> PlanningPolicy {
    let selection = match config {
        SelectionConfig::WeightedSum => SelectionPolicy::WeightedSum,
        SelectionConfig::Lexicographic { order, cost_budget, tolerance } => SelectionPolicy::Lexicographic {
            order: order.iter().map(|&term| term.into()).collect(),
            cost_budget: *cost_budget,
            tolerance: tolerance.unwrap_or(0.01),
        },
        SelectionConfig::MinWorstCase => SelectionPolicy::MinWorstCase,
    };

    policy.with_selection(selection)
}

fn configure_rake(mut policy: PlanningPolicy, config: &RakeConfig) -> PlanningPolicy {
    let min = config.min_length.unwrap_or(policy.rake_length.min);
    let max = config.max_length.unwrap_or(policy.rake_length.max);
    policy = policy.with_rake_length(min, max);

    if let Some(wagon_sharing) = config.wagon_sharing {
        policy = policy.with_wagon_sharing(wagon_sharing);
    }

    if let Some(tiers) = &config.soft_deadline_tiers {
        policy = policy.with_soft_deadline_tiers(tiers.clone());
    }

    if let Some(slice_length) = config.slice_length {
        policy.slice_length = slice_length * HOUR;
    }

    if let Some(route_alternatives) = config.route_alternatives {
        policy.route_alternatives = route_alternatives;
    }

    policy
}

fn configure_tariff(policy: PlanningPolicy, config: &TariffConfig) -> PlanningPolicy {
    let defaults = policy.tariff.clone();
    policy.with_tariff(Tariff {
        per_tonne_km: config.per_tonne_km.unwrap_or(defaults.per_tonne_km),
        handling_cost: config.handling_cost.unwrap_or(defaults.handling_cost),
        penalty_rate: config.penalty_rate.unwrap_or(defaults.penalty_rate),
        demurrage_rate: config.demurrage_rate.unwrap_or(defaults.demurrage_rate),
    })
}

fn configure_search(mut policy: PlanningPolicy, config: &SearchConfig) -> PlanningPolicy {
    if let Some(method) = config.method {
        policy = policy.with_method(method.into());
    }

    policy.exact_threshold = config.exact_threshold.unwrap_or(policy.exact_threshold);
    policy.exact_node_limit = config.exact_node_limit.unwrap_or(policy.exact_node_limit);
    policy.require_dispatch = config.require_dispatch.unwrap_or(policy.require_dispatch);

    let defaults = policy.evolution.clone();
    let evolution = EvolutionConfig {
        population_size: config.population_size.unwrap_or(defaults.population_size),
        offspring_size: config.offspring_size.unwrap_or(defaults.offspring_size),
        max_generations: config.max_generations.unwrap_or(defaults.max_generations),
        max_time: config.max_time.or(defaults.max_time),
        seeds: config.seeds.unwrap_or(defaults.seeds),
        crossover_probability: config.crossover_probability.unwrap_or(defaults.crossover_probability),
    };
    policy = policy.with_evolution(evolution);

    match config.seed {
        Some(seed) => policy.with_seed(seed),
        None => policy,
    }
}

fn configure_scenario(policy: PlanningPolicy, config: &ScenarioSettings) -> PlanningPolicy {
    let mut scenario = policy.scenario.clone();

    scenario.samples = config.samples.unwrap_or(scenario.samples);
    scenario.percentile = config.percentile.unwrap_or(scenario.percentile);
    if let Some(distribution) = &config.loading_delay {
        scenario.loading_delay = distribution.into();
    }
    if let Some(distribution) = &config.transit_delay {
        scenario.transit_delay = distribution.into();
    }
    if let Some(distribution) = &config.congestion {
        scenario.congestion = distribution.into();
    }

    policy.with_scenario(scenario)
}

/// Reads config from reader.
pub fn read_config<R: Read>(reader: BufReader<R>) -> Result<Config, GenericError> {
    serde_json::from_reader(reader).map_err(|err| format!("cannot deserialize config: '{err}'").into())
}

/// Creates a planning policy from config. The policy is validated before it is returned.
pub fn create_policy_from_config(config: &Config) -> Result<PlanningPolicy, GenericError> {
    let mut policy = PlanningPolicy::default();

    if let Some(weights) = &config.weights {
        policy = configure_weights(policy, weights);
    }
    if let Some(selection) = &config.selection {
        policy = configure_selection(policy, selection);
    }
    if let Some(rake) = &config.rake {
        policy = configure_rake(policy, rake);
    }
    if let Some(tariff) = &config.tariff {
        policy = configure_tariff(policy, tariff);
    }
    // scenario goes before search as search seed overrides sampling seed
    if let Some(scenario) = &config.scenario {
        policy = configure_scenario(policy, scenario);
    }
    if let Some(search) = &config.search {
        policy = configure_search(policy, search);
    }

    policy.validate().map_err(|err| format!("invalid planning policy: {err}"))?;

    Ok(policy)
}

/// Creates an execution environment from config using the given quota.
pub fn create_environment_from_config(config: &Config, quota: Option<Arc<dyn Quota + Send + Sync>>) -> Environment {
    let random: Arc<dyn Random + Send + Sync> = match config.search.as_ref().and_then(|search| search.seed) {
        Some(seed) => Arc::new(DefaultRandom::new_repeatable(seed)),
        None => Arc::new(DefaultRandom::default()),
    };

    let environment = config.environment.clone().unwrap_or_default();
    let parallelism = environment.threads.map_or_else(Parallelism::default, Parallelism::new);
    let logger: InfoLogger = if environment.logging.unwrap_or(false) {
        Arc::new(|msg: &str| println!("{msg}"))
    } else {
        Arc::new(|_: &str| {})
    };

    Environment::new(random, quota, parallelism, logger)
}
