#[cfg(test)]
#[path = "../../tests/unit/checker/composition_test.rs"]
mod composition_test;

use super::*;
use rake_core::construction::constraints::{ConstraintValidator, Occupancy};
use rake_core::models::solution::Solution;
use rake_core::solver::objectives::evaluate;

const OBJECTIVE_TOLERANCE: f64 = 1E-6;

/// Checks hard constraints of every rake and reported objectives.
pub fn check_compositions(ctx: &CheckerContext) -> Result<(), Vec<FormatError>> {
    let compositions = ctx.plan.rakes.iter().map(|rake| ctx.get_composition(rake)).collect::<Result<Vec<_>, _>>();
    let compositions = compositions.map_err(|err| vec![err])?;

    let errors = check_hard_constraints(ctx, compositions.as_slice())
        .err()
        .into_iter()
        .chain(check_objectives(ctx, compositions).err())
        .collect::<Vec<_>>();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Checks that no rake violates hard constraints given the rakes listed before it.
fn check_hard_constraints(ctx: &CheckerContext, compositions: &[RakeComposition]) -> Result<(), FormatError> {
    let validator = ConstraintValidator::new(ctx.world.as_ref(), ctx.policy.as_ref());
    let mut occupancy = Occupancy::default();

    let violations = ctx
        .plan
        .rakes
        .iter()
        .zip(compositions.iter())
        .filter_map(|(rake, composition)| {
            let result = validator.is_feasible(composition, &occupancy);
            occupancy.accept(composition);

            result.err().map(|violations| {
                let codes = violations.iter().map(|kind| kind.code()).collect::<Vec<_>>();
                format!("{}: {}", rake.id, codes.join(", "))
            })
        })
        .collect::<Vec<_>>();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(FormatError::new(
            "E2003".to_string(),
            "rakes violate hard constraints".to_string(),
            format!("fix rakes, violations: '{}'", violations.join("; ")),
        ))
    }
}

/// Checks that reported objectives are the ones calculated from rakes.
fn check_objectives(ctx: &CheckerContext, compositions: Vec<RakeComposition>) -> Result<(), FormatError> {
    let solution = Solution { compositions, deferred: vec![] };
    let expected = evaluate(&solution, ctx.world.as_ref(), ctx.policy.as_ref());
    let actual = &ctx.plan.objectives;

    let mismatched = [
        ("cost", expected.cost, actual.cost),
        ("delayPenalty", expected.delay_penalty, actual.delay_penalty),
        ("utilization", expected.utilization, actual.utilization),
        ("demurrage", expected.demurrage, actual.demurrage),
    ]
    .into_iter()
    .filter(|(_, expected, actual)| (expected - actual).abs() > OBJECTIVE_TOLERANCE * expected.abs().max(1.))
    .map(|(name, expected, actual)| format!("{name}: expected {expected}, got {actual}"))
    .collect::<Vec<_>>();

    if mismatched.is_empty() {
        Ok(())
    } else {
        Err(FormatError::new(
            "E2004".to_string(),
            "reported objectives do not match rakes".to_string(),
            format!("recalculate objectives, {}", mismatched.join(", ")),
        ))
    }
}
