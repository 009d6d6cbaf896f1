//! Models of the rake formation domain: problem snapshot, solutions and planning policy.

pub mod common;
pub mod problem;
pub mod solution;

mod errors;
pub use self::errors::*;

mod policy;
pub use self::policy::*;
