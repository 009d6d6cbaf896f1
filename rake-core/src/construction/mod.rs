//! The construction module contains building blocks of feasible solutions: hard constraints,
//! a decoder which schedules composition drafts and constructive seeding heuristics.

pub mod constraints;
pub mod decoder;
pub mod seeds;
