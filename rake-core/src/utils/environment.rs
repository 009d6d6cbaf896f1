#[cfg(test)]
#[path = "../../tests/unit/utils/environment_test.rs"]
mod environment_test;

use crate::utils::{DefaultRandom, Float, Random, ThreadPool, Timer};
use std::sync::Arc;

/// A logger type which is called with various information regarding the work done by the planner.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Specifies a computational quota for a planning cycle.
/// The main purpose is to allow to stop algorithm in reaction to external events such
/// as user cancellation, timer, etc.
pub trait Quota {
    /// Returns true when computation should be stopped.
    fn is_reached(&self) -> bool;
}

/// A time quota.
pub struct TimeQuota {
    start: Timer,
    limit_in_secs: Float,
}

impl TimeQuota {
    /// Creates a new instance of `TimeQuota`.
    pub fn new(limit_in_secs: Float) -> Self {
        Self { start: Timer::start(), limit_in_secs }
    }
}

impl Quota for TimeQuota {
    fn is_reached(&self) -> bool {
        self.start.elapsed_secs_as_float() > self.limit_in_secs
    }
}

/// Keeps track of parallelism settings: a bounded pool used for pure evaluations.
#[derive(Clone)]
pub struct Parallelism {
    available_cpus: usize,
    thread_pool: Arc<ThreadPool>,
}

impl Parallelism {
    /// Creates a new instance of `Parallelism` with the given amount of worker threads.
    pub fn new(threads: usize) -> Self {
        let threads = threads.max(1);
        Self { available_cpus: threads, thread_pool: Arc::new(ThreadPool::new(threads)) }
    }

    /// Returns amount of available worker threads.
    pub fn available_cpus(&self) -> usize {
        self.available_cpus
    }

    /// Executes operation on the bounded thread pool.
    pub fn execute<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.thread_pool.execute(op)
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::new(get_cpus())
    }
}

/// Keeps track of environment specific information which influences algorithm behavior.
#[derive(Clone)]
pub struct Environment {
    /// A wrapper on random generator.
    pub random: Arc<dyn Random + Send + Sync>,

    /// A global execution quota.
    pub quota: Option<Arc<dyn Quota + Send + Sync>>,

    /// Keeps data parallelism settings.
    pub parallelism: Parallelism,

    /// An information logger.
    pub logger: InfoLogger,
}

impl Environment {
    /// Creates an instance of `Environment` with repeatable random and silent logger.
    pub fn new_repeatable(seed: u64) -> Self {
        Self { random: Arc::new(DefaultRandom::new_repeatable(seed)), ..Self::default() }
    }

    /// Creates a new instance of `Environment`.
    pub fn new(
        random: Arc<dyn Random + Send + Sync>,
        quota: Option<Arc<dyn Quota + Send + Sync>>,
        parallelism: Parallelism,
        logger: InfoLogger,
    ) -> Self {
        Self { random, quota, parallelism, logger }
    }

    /// Returns true if quota is set and reached.
    pub fn is_quota_reached(&self) -> bool {
        self.quota.as_ref().is_some_and(|quota| quota.is_reached())
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(Arc::new(DefaultRandom::default()), None, Parallelism::default(), Arc::new(|_| {}))
    }
}

/// Returns amount of CPUs.
pub fn get_cpus() -> usize {
    num_cpus::get()
}
