//! The solver module orchestrates a planning cycle: seeding, exact or evolutionary search,
//! scenario evaluation, selection and explanation.
//!
//! # Examples
//!
//! ```
//! # use rake_core::prelude::*;
//! # use std::sync::Arc;
//! let world = WorldState::new(0., vec![], vec![], vec![], vec![], vec![])?;
//! let solver = Solver::new(Arc::new(world), Arc::new(PlanningPolicy::default()), Arc::new(Environment::new_repeatable(0)));
//!
//! let plan = solver.solve()?;
//!
//! assert!(plan.solution.compositions.is_empty());
//! assert!(plan.solution.deferred.is_empty());
//! # Ok::<(), PlanningError>(())
//! ```

#[cfg(test)]
#[path = "../../tests/unit/solver/solver_test.rs"]
mod solver_test;

pub mod evolution;
pub mod exact;
pub mod objectives;
pub mod operators;
pub mod telemetry;

use self::exact::SearchOutcome;
use self::objectives::create_candidate;
use self::telemetry::{Telemetry, TelemetryMetrics, TelemetryMode};
use crate::construction::decoder::Decoder;
use crate::construction::seeds::create_seeds;
use crate::models::problem::WorldState;
use crate::models::solution::{Candidate, DispatchPlan, FrontMember};
use crate::models::{PlanningError, PlanningPolicy, SolveMethod};
use crate::scenarios::evaluate_scenarios;
use crate::selection::{calculate_kpis, explain, select_solution};
use crate::utils::{Environment, Timer};
use std::sync::Arc;

/// A result of the optimization step.
pub struct OptimizationResult {
    /// Non-dominated candidates, never empty.
    pub front: Vec<Candidate>,
    /// A method which was actually used.
    pub method: SolveMethod,
    /// True if search was stopped early.
    pub budget_exceeded: bool,
    /// Search metrics.
    pub metrics: TelemetryMetrics,
}

/// Solves one planning cycle for the given snapshot.
pub struct Solver {
    world: Arc<WorldState>,
    policy: Arc<PlanningPolicy>,
    environment: Arc<Environment>,
    telemetry_mode: TelemetryMode,
    cycle: usize,
}

impl Solver {
    /// Creates a new instance of `Solver` which logs progress using environment logger.
    pub fn new(world: Arc<WorldState>, policy: Arc<PlanningPolicy>, environment: Arc<Environment>) -> Self {
        let telemetry_mode = TelemetryMode::OnlyLogging { logger: environment.logger.clone(), log_best: 100 };
        Self { world, policy, environment, telemetry_mode, cycle: 0 }
    }

    /// Sets telemetry mode.
    pub fn with_telemetry(mut self, telemetry_mode: TelemetryMode) -> Self {
        self.telemetry_mode = telemetry_mode;
        self
    }

    /// Sets planning cycle number stamped on the plan.
    pub fn with_cycle(mut self, cycle: usize) -> Self {
        self.cycle = cycle;
        self
    }

    /// Returns a method which will be used for the snapshot.
    pub fn resolve_method(&self) -> SolveMethod {
        match self.policy.method {
            SolveMethod::Auto => {
                let wagons = self.world.wagons.iter().filter(|wagon| wagon.is_available()).count();
                if self.world.orders.len() * wagons <= self.policy.exact_threshold {
                    SolveMethod::Exact
                } else {
                    SolveMethod::Heuristic
                }
            }
            method => method,
        }
    }

    /// Runs seeding and search, returns the Pareto front.
    pub fn optimize(&self) -> Result<OptimizationResult, PlanningError> {
        self.policy.validate()?;

        let world = self.world.as_ref();
        let policy = self.policy.as_ref();
        let environment = self.environment.as_ref();

        let decoder = Decoder::new(world, policy);
        let mut telemetry = Telemetry::new(self.telemetry_mode.clone());
        let method = self.resolve_method();

        let seed_time = Timer::start();
        let max_seeds = if method == SolveMethod::Greedy { 1 } else { policy.evolution.seeds };
        let seeds = create_seeds(&decoder, max_seeds, Some(environment.random.as_ref()))
            .into_iter()
            .map(|solution| create_candidate(solution, world, policy))
            .collect::<Vec<_>>();
        telemetry.on_initial(&seeds, seed_time);

        let SearchOutcome { front, budget_exceeded } = match method {
            SolveMethod::Exact => exact::solve_exact(&decoder, environment, seeds, &mut telemetry)?,
            SolveMethod::Greedy => SearchOutcome { front: seeds.into_iter().take(1).collect(), budget_exceeded: false },
            SolveMethod::Heuristic | SolveMethod::Auto => {
                evolution::solve_heuristic(&decoder, environment, seeds, &mut telemetry)
            }
        };

        let method_name = format!("{method:?}").to_lowercase();
        let metrics = telemetry.on_result(&method_name, &front, budget_exceeded);

        Ok(OptimizationResult { front, method, budget_exceeded, metrics })
    }

    /// Solves the planning cycle and returns a dispatch plan.
    pub fn solve(&self) -> Result<DispatchPlan, PlanningError> {
        let OptimizationResult { front, method, budget_exceeded, metrics } = self.optimize()?;

        let world = self.world.as_ref();
        let policy = self.policy.as_ref();

        let scores = evaluate_scenarios(&front, world, policy, self.environment.as_ref());
        let chosen = select_solution(&front, &scores, world, policy)
            .ok_or_else(|| PlanningError::Generic("optimizer returned an empty front".into()))?;

        let candidate = &front[chosen];
        let robustness = scores[chosen].clone();
        let explanation = explain(candidate, world, policy);
        let kpis = calculate_kpis(candidate, &robustness, world);

        let front = front
            .iter()
            .zip(scores.iter())
            .map(|(member, score)| FrontMember {
                objectives: member.objectives.clone(),
                robustness: score.clone(),
                deferred: member.deferred_count(),
            })
            .collect();

        Ok(DispatchPlan {
            cycle: self.cycle,
            snapshot_version: world.version,
            solution: candidate.solution.clone(),
            objectives: candidate.objectives.clone(),
            robustness,
            explanation,
            kpis,
            method,
            budget_exceeded,
            chosen,
            front,
            metrics,
        })
    }
}
