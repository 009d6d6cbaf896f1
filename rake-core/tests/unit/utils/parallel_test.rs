use super::*;

#[test]
fn can_use_parallel_collect_keeping_order() {
    let source = (0..100).collect::<Vec<_>>();

    let result = parallel_collect(&source, |item| item * 2);

    assert_eq!(result, (0..100).map(|item| item * 2).collect::<Vec<_>>());
}

#[test]
fn can_use_parallel_into_collect_keeping_order() {
    let source = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];

    let result = parallel_into_collect(source, |item| item.len());

    assert_eq!(result, vec![1, 2, 3]);
}

#[test]
fn can_execute_on_thread_pool() {
    let pool = ThreadPool::new(2);

    let result = pool.execute(|| rayon::current_num_threads());

    assert_eq!(result, 2);
}
