use super::{ObjectiveVector, Solution};
use crate::models::SolveMethod;
use crate::scenarios::ScenarioScore;
use crate::selection::{Explanation, Kpis};
use crate::solver::telemetry::TelemetryMetrics;
use std::sync::Arc;

/// A short description of a Pareto front member.
#[derive(Clone, Debug, PartialEq)]
pub struct FrontMember {
    /// Nominal objectives.
    pub objectives: ObjectiveVector,
    /// Robustness scores.
    pub robustness: ScenarioScore,
    /// Amount of deferred orders.
    pub deferred: usize,
}

/// The outcome of a planning cycle. Immutable once published, superseded by the next cycle's plan.
#[derive(Clone, Debug)]
pub struct DispatchPlan {
    /// Planning cycle number.
    pub cycle: usize,
    /// Version of the snapshot the plan is computed for.
    pub snapshot_version: usize,
    /// Chosen solution.
    pub solution: Arc<Solution>,
    /// Nominal objectives of the chosen solution.
    pub objectives: ObjectiveVector,
    /// Scenario robustness of the chosen solution.
    pub robustness: ScenarioScore,
    /// Explanation trace.
    pub explanation: Explanation,
    /// Key performance indicators.
    pub kpis: Kpis,
    /// Solve method used.
    pub method: SolveMethod,
    /// True if the search was stopped by time budget or interruption.
    pub budget_exceeded: bool,
    /// Index of the chosen solution in the front.
    pub chosen: usize,
    /// Pareto front summary.
    pub front: Vec<FrontMember>,
    /// Search metrics.
    pub metrics: TelemetryMetrics,
}
