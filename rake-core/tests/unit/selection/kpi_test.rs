use super::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::solution::*;

#[test]
fn can_calculate_kpis_of_plan() {
    let world = create_test_world(vec![test_order("o1", 10.), test_order("o2", 40.)], test_wagons(1, 25.));
    let policy = create_test_policy();
    let candidate = create_test_candidate(&world, &policy, vec![test_draft(vec![0])], vec![1]);
    let robustness = ScenarioScore { on_time_probability: 0.75, ..ScenarioScore::default() };

    let kpis = calculate_kpis(&candidate, &robustness, &world);

    assert_eq!(
        kpis,
        Kpis {
            cost_per_tonne_km: 6000. / 5000.,
            on_time_ratio: 1.,
            expected_on_time_ratio: 0.75,
            average_utilization: 0.4,
            demurrage_share: 0.,
            dispatched_tonnage: 10.,
            deferred_tonnage: 40.,
            rakes: 1,
            wagons: 1,
        }
    );
    assert!(!kpis.meets_targets());
}

#[test]
fn can_calculate_kpis_of_empty_plan() {
    let world = create_test_world(vec![test_order("o1", 10.)], vec![]);
    let policy = create_test_policy();
    let candidate = create_test_candidate(&world, &policy, vec![], vec![0]);

    let kpis = calculate_kpis(&candidate, &ScenarioScore::default(), &world);

    assert_eq!(kpis.cost_per_tonne_km, 0.);
    assert_eq!(kpis.on_time_ratio, 1.);
    assert_eq!(kpis.demurrage_share, 0.);
    assert_eq!(kpis.deferred_tonnage, 10.);
    assert_eq!(kpis.rakes, 0);
}

parameterized_test! {can_check_targets, (average_utilization, demurrage_share, expected), {
    let kpis = Kpis { average_utilization, demurrage_share, ..Kpis::default() };
    assert_eq!(kpis.meets_targets(), expected);
}}

can_check_targets! {
    case01_met: (0.9, 0.01, true),
    case02_low_utilization: (0.8, 0.01, false),
    case03_high_demurrage: (0.9, 0.05, false),
    case04_at_limits: (UTILIZATION_TARGET, DEMURRAGE_SHARE_TARGET, true),
}
