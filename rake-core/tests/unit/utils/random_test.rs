use super::*;
use rand::RngCore;

parameterized_test! {can_return_weighted_index_only_for_positive_weights, (weights, expected), {
    can_return_weighted_index_only_for_positive_weights_impl(weights, expected);
}}

can_return_weighted_index_only_for_positive_weights! {
    case01_single: (vec![0, 5, 0], 1),
    case02_last: (vec![0, 0, 1], 2),
    case03_first: (vec![3, 0], 0),
}

fn can_return_weighted_index_only_for_positive_weights_impl(weights: Vec<usize>, expected: usize) {
    let random = DefaultRandom::new_repeatable(0);

    (0..20).for_each(|_| assert_eq!(random.weighted(weights.as_slice()), expected));
}

#[test]
fn can_produce_values_in_range() {
    let random = DefaultRandom::new_repeatable(42);

    (0..100).for_each(|_| {
        let int = random.uniform_int(-3, 3);
        let real = random.uniform_real(1., 2.);

        assert!((-3..=3).contains(&int));
        assert!((1. ..2.).contains(&real));
    });

    assert_eq!(random.uniform_int(5, 5), 5);
    assert_eq!(random.uniform_real(0.5, 0.5), 0.5);
}

#[test]
fn can_repeat_sequence_with_the_same_seed() {
    let a = DefaultRandom::new_repeatable(7);
    let b = DefaultRandom::new_repeatable(7);

    let a = (0..10).map(|_| a.uniform_int(0, 1000)).collect::<Vec<_>>();
    let b = (0..10).map(|_| b.uniform_int(0, 1000)).collect::<Vec<_>>();

    assert_eq!(a, b);
}

#[test]
fn can_handle_hit_probability_bounds() {
    let random = DefaultRandom::new_repeatable(0);

    assert!((0..10).all(|_| random.is_hit(1.)));
    assert!((0..10).all(|_| !random.is_hit(0.)));
    assert!((0..10).all(|_| !random.is_hit(-1.)));
}

#[test]
fn can_shuffle_keeping_all_items() {
    let random = DefaultRandom::new_repeatable(3);
    let mut items = (0..20).collect::<Vec<_>>();

    shuffle_with(items.as_mut_slice(), &random);
    items.sort_unstable();

    assert_eq!(items, (0..20).collect::<Vec<_>>());
}

#[test]
fn can_create_independent_but_repeatable_streams() {
    let sample = |seed, stream| {
        let mut rng = create_stream_rng(seed, stream);
        (0..5).map(|_| rng.next_u64()).collect::<Vec<_>>()
    };

    assert_eq!(sample(1, 0), sample(1, 0));
    assert_ne!(sample(1, 0), sample(1, 1));
    assert_ne!(sample(1, 0), sample(2, 0));
}
