//! A helper module which contains functionality to run feasibility checks on a plan.

#[cfg(test)]
#[path = "../../../tests/unit/extensions/check/check_test.rs"]
mod check_test;

use rake_core::prelude::PlanningPolicy;
use rake_pragmatic::checker::CheckerContext;
use rake_pragmatic::format::plan::deserialize_plan;
use rake_pragmatic::format::snapshot::PragmaticSnapshot;
use std::io::{BufReader, Read};
use std::sync::Arc;

/// Checks pragmatic plan feasibility against its snapshot using the given policy.
pub fn check_pragmatic_plan<R1: Read, R2: Read>(
    snapshot_reader: BufReader<R1>,
    plan_reader: BufReader<R2>,
    policy: Arc<PlanningPolicy>,
) -> Result<(), Vec<String>> {
    let world = snapshot_reader
        .read_pragmatic()
        .map_err(|errors| errors.into_iter().map(|err| format!("cannot read snapshot: {err}")).collect::<Vec<_>>())?;

    let plan = deserialize_plan(plan_reader).map_err(|err| vec![format!("cannot read plan: '{err}'")])?;

    CheckerContext::new(Arc::new(world), policy, plan)
        .check()
        .map_err(|errors| errors.into_iter().map(|err| err.to_string()).collect())
}
