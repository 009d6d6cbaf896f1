use crate::checker::CheckerContext;
use crate::format::plan::create_plan;
use crate::format::snapshot::PragmaticSnapshot;
use crate::helpers::*;
use rake_core::prelude::*;
use std::sync::Arc;

fn create_dispatcher() -> Dispatcher {
    let snapshot = create_test_snapshot(vec![create_order("o1", 50.), create_order("o2", 50.)], create_wagons(1, 60.));
    let world = snapshot.read_pragmatic().expect("cannot read snapshot");

    Dispatcher::new(world, Arc::new(create_exact_policy()), Arc::new(Environment::new_repeatable(0)))
        .expect("cannot create dispatcher")
}

#[test]
fn can_plan_commit_and_replan_with_released_wagons() {
    let dispatcher = create_dispatcher();

    let first = dispatcher.run_cycle().unwrap();
    let first_plan = create_plan(dispatcher.snapshot().unwrap().as_ref(), first.as_ref());
    assert_eq!(first_plan.rakes.len(), 1);
    assert_eq!(first_plan.deferred.len(), 1);
    assert_eq!(first_plan.deferred[0].reason, "CAPACITY_EXHAUSTED");
    let deferred_id = first_plan.deferred[0].order_id.clone();

    let world = dispatcher.commit(first.as_ref()).unwrap();
    assert_eq!(world.version, 1);
    assert_eq!(world.orders.len(), 1);
    assert_eq!(world.orders[0].id, deferred_id);

    let second = dispatcher.run_cycle().unwrap();
    let second_plan = create_plan(world.as_ref(), second.as_ref());
    assert_eq!(second_plan.cycle, 2);
    assert!(second_plan.rakes.is_empty());
    assert_eq!(second_plan.deferred[0].reason, "NO_COMPATIBLE_WAGON");
    assert_eq!(second_plan.deferred[0].violations, vec!["WAGON_AVAILABILITY".to_string()]);

    let world = dispatcher.release(&["w1"]).unwrap();
    assert_eq!(world.version, 2);

    let third = dispatcher.run_cycle().unwrap();
    let third_plan = create_plan(world.as_ref(), third.as_ref());
    assert_eq!(third_plan.rakes.len(), 1);
    assert_eq!(third_plan.rakes[0].orders, vec![deferred_id]);
    assert!(third_plan.deferred.is_empty());
}

#[test]
fn can_detect_plan_checked_against_next_snapshot() {
    let dispatcher = create_dispatcher();
    let plan = dispatcher.run_cycle().unwrap();
    let plan_model = create_plan(dispatcher.snapshot().unwrap().as_ref(), plan.as_ref());
    let next = dispatcher.commit(plan.as_ref()).unwrap();

    let result = CheckerContext::new(next, Arc::new(create_exact_policy()), plan_model).check();

    assert!(result.err().expect("stale plan should not pass check").codes().contains(&"E2000"));
}
