//! This module reimports commonly used types.

// Reimport problem and solution models
pub use crate::models::common::{DAY, HOUR, TimeWindow};
pub use crate::models::problem::{
    Amendment, Backlog, Booking, HandlingMode, LoadingPoint, MaterialSpec, Order, RouteRestriction, RouteSegment,
    WagonProfile, WagonStatus, WagonUnit, WorldState,
};
pub use crate::models::solution::{DeferralReason, DispatchPlan, ObjectiveTerm, ObjectiveVector, RakeComposition, Solution};
pub use crate::models::{
    EvolutionConfig, ObjectiveWeights, PlanningError, PlanningPolicy, RakeLength, SelectionPolicy, SolveMethod, Tariff,
};

// Reimport engine types
pub use crate::construction::constraints::{ConstraintKind, ConstraintValidator};
pub use crate::dispatch::Dispatcher;
pub use crate::scenarios::{Distribution, ScenarioConfig, ScenarioScore};
pub use crate::selection::{Explanation, Kpis};
pub use crate::solver::Solver;

// Reimport utils
pub use crate::utils::{
    DefaultRandom, Environment, Float, GenericError, GenericResult, InfoLogger, Quota, Random, compare_floats,
};
