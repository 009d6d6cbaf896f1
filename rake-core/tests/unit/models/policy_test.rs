use super::*;
use crate::helpers::models::problem::OrderBuilder;
use crate::scenarios::Distribution;

#[test]
fn can_validate_default_policy() {
    assert!(PlanningPolicy::default().validate().is_ok());
}

parameterized_test! {can_detect_invalid_policy, (policy, expected), {
    can_detect_invalid_policy_impl(policy, expected);
}}

can_detect_invalid_policy! {
    case01_zero_min_length: (PlanningPolicy::default().with_rake_length(0, 10), "invalid rake length"),
    case02_inverted_length: (PlanningPolicy::default().with_rake_length(5, 2), "invalid rake length"),
    case03_negative_weight: (
        PlanningPolicy::default().with_weights(ObjectiveWeights { cost: -1., ..ObjectiveWeights::default() }),
        "objective weights"
    ),
    case04_negative_rate: (
        PlanningPolicy::default().with_tariff(Tariff { penalty_rate: -5., ..Tariff::default() }),
        "tariffs and rates"
    ),
    case05_empty_lexicographic: (
        PlanningPolicy::default().with_selection(SelectionPolicy::Lexicographic { order: vec![], cost_budget: None, tolerance: 0. }),
        "lexicographic order"
    ),
    case06_bad_distribution: (
        PlanningPolicy::default().with_scenario(ScenarioConfig {
            transit_delay: Distribution::Exponential { rate: 0. },
            ..ScenarioConfig::default()
        }),
        "invalid distribution"
    ),
}

fn can_detect_invalid_policy_impl(policy: PlanningPolicy, expected: &str) {
    let result = policy.validate();

    let err = result.expect_err("policy should be invalid");
    assert!(err.to_string().contains(expected), "unexpected error: {err}");
}

parameterized_test! {can_tolerate_delay_only_for_soft_tiers, (priority, hard_deadline, expected), {
    can_tolerate_delay_only_for_soft_tiers_impl(priority, hard_deadline, expected);
}}

can_tolerate_delay_only_for_soft_tiers! {
    case01_soft_tier: (1, false, true),
    case02_hard_tier: (3, false, false),
    case03_hard_flag_overrides_tier: (1, true, false),
}

fn can_tolerate_delay_only_for_soft_tiers_impl(priority: PriorityTier, hard_deadline: bool, expected: bool) {
    let policy = PlanningPolicy::default().with_soft_deadline_tiers(vec![0, 1]);
    let builder = OrderBuilder::new("o1", 10.).priority(priority);
    let order = if hard_deadline { builder.hard_deadline().build() } else { builder.build() };

    assert_eq!(policy.is_delay_tolerated(&order), expected);
}

#[test]
fn can_treat_every_order_as_hard_by_default() {
    let order = OrderBuilder::new("o1", 10.).build();

    assert!(!PlanningPolicy::default().is_delay_tolerated(&order));
}

#[test]
fn can_set_scenario_seed() {
    let policy = PlanningPolicy::default().with_seed(42);

    assert_eq!(policy.scenario.seed, 42);
}
