#[cfg(test)]
#[path = "../../tests/unit/utils/parallel_test.rs"]
mod parallel_test;

use rayon::prelude::*;
use rayon::{ThreadPool as RayonThreadPool, ThreadPoolBuilder};

/// Represents a thread pool wrapper.
pub struct ThreadPool {
    inner: RayonThreadPool,
}

impl ThreadPool {
    /// Creates a new instance of `ThreadPool`.
    pub fn new(num_threads: usize) -> Self {
        Self {
            inner: ThreadPoolBuilder::new()
                .num_threads(num_threads.max(1))
                .build()
                .expect("cannot build a thread pool"),
        }
    }

    /// Executes given operation on thread pool.
    pub fn execute<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.inner.install(op)
    }
}

/// Maps collection and collects results into vector in parallel.
pub fn parallel_collect<T, F, R>(source: &[T], map_op: F) -> Vec<R>
where
    T: Send + Sync,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    source.par_iter().map(map_op).collect()
}

/// Maps collection and collects results into vector in parallel.
pub fn parallel_into_collect<T, F, R>(source: Vec<T>, map_op: F) -> Vec<R>
where
    T: Send + Sync,
    F: Fn(T) -> R + Sync + Send,
    R: Send,
{
    source.into_par_iter().map(map_op).collect()
}
