//! Contains generic algorithms which are not bound to rake formation domain.

pub mod nsga2;
