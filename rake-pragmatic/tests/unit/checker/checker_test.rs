use super::*;
use crate::helpers::*;

fn get_codes(ctx: &CheckerContext) -> Vec<String> {
    ctx.check().err().map_or(vec![], |err| err.errors.into_iter().map(|err| err.code).collect())
}

#[test]
fn can_accept_solver_plan() {
    let (world, policy, plan) = create_solved_parts(create_two_orders_snapshot());

    let ctx = CheckerContext::new(world, policy, plan);

    assert_eq!(get_codes(&ctx), Vec::<String>::new());
}

#[test]
fn can_detect_tampered_objectives() {
    let (world, policy, mut plan) = create_solved_parts(create_two_orders_snapshot());
    plan.objectives.cost -= 100.;

    let ctx = CheckerContext::new(world, policy, plan);

    assert_eq!(get_codes(&ctx), vec!["E2004"]);
}

#[test]
fn can_report_unknown_wagon_once() {
    let (world, policy, mut plan) = create_solved_parts(create_two_orders_snapshot());
    plan.rakes[0].wagons[0].wagon_id = "w99".to_string();

    let ctx = CheckerContext::new(world, policy, plan);

    let result = ctx.check();
    let errors = result.err().expect("plan with unknown wagon should fail").errors;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "E2001");
    assert_eq!(errors[0].cause, "plan refers to unknown wagon 'w99'");
}

#[test]
fn can_detect_order_placed_twice() {
    let (world, policy, mut plan) = create_solved_parts(create_two_orders_snapshot());
    plan.deferred.push(crate::format::plan::DeferredOrder {
        order_id: "o1".to_string(),
        reason: "CAPACITY_EXHAUSTED".to_string(),
        violations: vec![],
    });

    let ctx = CheckerContext::new(world, policy, plan);

    assert_eq!(get_codes(&ctx), vec!["E2002"]);
}

#[test]
fn can_detect_unknown_route() {
    let (world, policy, mut plan) = create_solved_parts(create_two_orders_snapshot());
    plan.rakes[0].route = vec!["plant1".to_string(), "hub".to_string(), "city1".to_string()];

    let ctx = CheckerContext::new(world, policy, plan);

    assert_eq!(get_codes(&ctx), vec!["E2001"]);
}
