use super::*;
use crate::utils::create_stream_rng;

parameterized_test! {can_validate_distribution, (distribution, expected), {
    assert_eq!(distribution.validate().is_ok(), expected);
}}

can_validate_distribution! {
    case01_fixed: (Distribution::Fixed(1.), true),
    case02_fixed_nan: (Distribution::Fixed(Float::NAN), false),
    case03_uniform: (Distribution::Uniform { min: 0., max: 1. }, true),
    case04_uniform_inverted: (Distribution::Uniform { min: 2., max: 1. }, false),
    case05_normal_negative_std: (Distribution::Normal { mean: 0., std_dev: -1. }, false),
    case06_log_normal: (Distribution::LogNormal { mu: 0., sigma: 0.5 }, true),
    case07_exponential_zero_rate: (Distribution::Exponential { rate: 0. }, false),
    case08_triangular: (Distribution::Triangular { min: 0., mode: 1., max: 2. }, true),
    case09_triangular_bad_mode: (Distribution::Triangular { min: 0., mode: 3., max: 2. }, false),
}

parameterized_test! {can_calculate_mean, (distribution, expected), {
    assert!((distribution.mean() - expected).abs() < 1E-9);
}}

can_calculate_mean! {
    case01_fixed: (Distribution::Fixed(2.), 2.),
    case02_uniform: (Distribution::Uniform { min: 1., max: 3. }, 2.),
    case03_normal: (Distribution::Normal { mean: 2., std_dev: 1. }, 2.),
    case04_exponential: (Distribution::Exponential { rate: 0.5 }, 2.),
    case05_triangular: (Distribution::Triangular { min: 0., mode: 3., max: 3. }, 2.),
}

parameterized_test! {can_sample_close_to_mean, distribution, {
    can_sample_close_to_mean_impl(distribution);
}}

can_sample_close_to_mean! {
    case01_uniform: Distribution::Uniform { min: 0., max: 2. },
    case02_normal: Distribution::Normal { mean: 1., std_dev: 0.5 },
    case03_exponential: Distribution::Exponential { rate: 1. },
    case04_triangular: Distribution::Triangular { min: 0., mode: 1., max: 2. },
    case05_log_normal: Distribution::LogNormal { mu: 0., sigma: 0.25 },
}

fn can_sample_close_to_mean_impl(distribution: Distribution) {
    let mut rng = create_stream_rng(0, 0);
    let amount = 10_000;

    let mean = (0..amount).map(|_| distribution.sample(&mut rng)).sum::<Float>() / amount as Float;

    assert!((mean - distribution.mean()).abs() < 0.05, "mean {mean} is too far from {}", distribution.mean());
}

parameterized_test! {can_sample_degenerate_distribution, (distribution, expected), {
    let mut rng = create_stream_rng(0, 0);
    assert_eq!(distribution.sample(&mut rng), expected);
}}

can_sample_degenerate_distribution! {
    case01_fixed: (Distribution::Fixed(3.), 3.),
    case02_uniform: (Distribution::Uniform { min: 2., max: 2. }, 2.),
    case03_normal: (Distribution::Normal { mean: 4., std_dev: 0. }, 4.),
    case04_triangular: (Distribution::Triangular { min: 1., mode: 1., max: 1. }, 1.),
}

#[test]
fn can_sample_within_bounds() {
    let mut rng = create_stream_rng(7, 1);
    let uniform = Distribution::Uniform { min: 1., max: 2. };
    let triangular = Distribution::Triangular { min: 0., mode: 0.5, max: 3. };

    (0..1000).for_each(|_| {
        assert!((1. ..=2.).contains(&uniform.sample(&mut rng)));
        assert!((0. ..=3.).contains(&triangular.sample(&mut rng)));
    });
}
