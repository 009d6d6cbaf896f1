//! Contains logic to pick one solution from the Pareto front, explain it and report KPIs.

mod explainer;
pub use self::explainer::*;

mod kpi;
pub use self::kpi::*;

mod selector;
pub use self::selector::*;
