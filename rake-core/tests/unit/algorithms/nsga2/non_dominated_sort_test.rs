use super::*;
use crate::helpers::algorithms::nsga2::VectorMultiObjective;

/// Creates `n_fronts` with each having `n` solutions in it.
fn create_solutions_with_n_fronts(n: usize, n_fronts: usize) -> (Vec<Vec<f64>>, Vec<Vec<usize>>) {
    let mut solutions = Vec::with_capacity(n * n_fronts);
    let mut expected_fronts = Vec::with_capacity(n_fronts);

    for front in 0..n_fronts {
        let mut current_front = Vec::with_capacity(n);
        for i in 0..n {
            solutions.push(vec![(front + i) as f64, (front + n - i) as f64]);
            current_front.push(front * n + i);
        }
        expected_fronts.push(current_front);
    }

    (solutions, expected_fronts)
}

#[test]
fn can_compare_dominance_relations() {
    let objective = VectorMultiObjective::new(2);
    let a = vec![1., 2.];
    let b = vec![1., 3.];
    let c = vec![0., 2.];
    let d = vec![2., 1.];

    assert_eq!(Ordering::Less, objective.total_order(&a, &b));
    assert_eq!(Ordering::Less, objective.total_order(&c, &a));
    assert_eq!(Ordering::Greater, objective.total_order(&b, &c));
    assert_eq!(Ordering::Equal, objective.total_order(&a, &a));
    assert_eq!(Ordering::Equal, objective.total_order(&a, &d));
}

#[test]
fn can_sort_into_fronts() {
    let objective = VectorMultiObjective::new(2);
    let solutions = vec![vec![1., 2.], vec![1., 2.], vec![2., 1.], vec![1., 3.], vec![0., 2.]];

    let f0 = non_dominated_sort(&solutions, &objective);
    assert_eq!(0, f0.rank());
    assert_eq!(&[2, 4], f0.indices());

    let f1 = f0.next_front();
    assert_eq!(1, f1.rank());
    assert_eq!(&[0, 1], f1.indices());

    let f2 = f1.next_front();
    assert_eq!(2, f2.rank());
    assert_eq!(&[3], f2.indices());

    let f3 = f2.next_front();
    assert!(f3.is_empty());
}

parameterized_test! {can_sort_many_fronts, (n, n_fronts), {
    can_sort_many_fronts_impl(n, n_fronts);
}}

can_sort_many_fronts! {
    case01: (3, 2),
    case02: (5, 4),
    case03: (1, 6),
}

fn can_sort_many_fronts_impl(n: usize, n_fronts: usize) {
    let objective = VectorMultiObjective::new(2);
    let (solutions, expected_fronts) = create_solutions_with_n_fronts(n, n_fronts);

    let mut front = non_dominated_sort(&solutions, &objective);
    for (rank, expected) in expected_fronts.iter().enumerate() {
        assert_eq!(rank, front.rank());
        assert_eq!(expected.len(), front.len());

        let mut indices = front.indices().to_vec();
        indices.sort_unstable();
        assert_eq!(expected, &indices);

        front = front.next_front();
    }

    assert!(front.is_empty());
}
