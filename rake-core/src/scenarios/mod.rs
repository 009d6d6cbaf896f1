//! Scenario evaluation: stochastic re-scoring of solutions under loading, transit and congestion perturbations.

mod distribution;
pub use self::distribution::*;

mod evaluator;
pub use self::evaluator::*;
