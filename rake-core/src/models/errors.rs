//! Specifies planning cycle failures.

use crate::construction::constraints::ConstraintKind;
use crate::utils::GenericError;
use std::fmt::{Display, Formatter};

/// Describes a single shape violation found in the snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IntegrityIssue {
    /// Entity kind, e.g. "order" or "wagon".
    pub entity: &'static str,
    /// Entity id.
    pub id: String,
    /// Problem description.
    pub message: String,
}

impl IntegrityIssue {
    /// Creates a new instance of `IntegrityIssue`.
    pub fn new(entity: &'static str, id: &str, message: impl Into<String>) -> Self {
        Self { entity, id: id.to_string(), message: message.into() }
    }
}

impl Display for IntegrityIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}': {}", self.entity, self.id, self.message)
    }
}

/// An order which cannot be dispatched at all together with constraints it cannot satisfy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsatisfiableOrder {
    /// Order id.
    pub order_id: String,
    /// Unsatisfiable constraints.
    pub constraints: Vec<ConstraintKind>,
}

/// A planning cycle error.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanningError {
    /// The snapshot violates shape invariants, the cycle is aborted.
    DataIntegrity(Vec<IntegrityIssue>),
    /// Exhaustive search proved that no order can be dispatched.
    InfeasibleInstance(Vec<UnsatisfiableOrder>),
    /// A plan was computed against an older snapshot than the current one.
    StaleSnapshot {
        /// Current snapshot version.
        expected: usize,
        /// Snapshot version used by the plan.
        actual: usize,
    },
    /// Any other error.
    Generic(GenericError),
}

impl Display for PlanningError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanningError::DataIntegrity(issues) => {
                let issues = issues.iter().map(|issue| issue.to_string()).collect::<Vec<_>>();
                write!(f, "data integrity violated: {}", issues.join("; "))
            }
            PlanningError::InfeasibleInstance(orders) => {
                let orders = orders
                    .iter()
                    .map(|order| {
                        let constraints = order.constraints.iter().map(|kind| kind.to_string()).collect::<Vec<_>>();
                        format!("{} [{}]", order.order_id, constraints.join(","))
                    })
                    .collect::<Vec<_>>();
                write!(f, "no order can be dispatched: {}", orders.join("; "))
            }
            PlanningError::StaleSnapshot { expected, actual } => {
                write!(f, "plan is built for snapshot version {actual}, current version is {expected}")
            }
            PlanningError::Generic(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for PlanningError {}

impl From<GenericError> for PlanningError {
    fn from(err: GenericError) -> Self {
        PlanningError::Generic(err)
    }
}
