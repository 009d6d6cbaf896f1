//! Core crate contains building blocks to form freight rakes from a backlog of customer orders:
//! a hard constraint validator, candidate generation, exact and evolutionary multi-objective
//! search, scenario based robustness evaluation and selection with explanation.
//!
//! A planning cycle works over an immutable [`WorldState`](models::problem::WorldState) snapshot
//! and produces a [`DispatchPlan`](models::solution::DispatchPlan). Use
//! [`Dispatcher`](dispatch::Dispatcher) to commit plans and derive next snapshots.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod algorithms;
pub mod construction;
pub mod dispatch;
pub mod models;
pub mod prelude;
pub mod scenarios;
pub mod selection;
pub mod solver;
pub mod utils;
