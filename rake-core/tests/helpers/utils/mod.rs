use crate::utils::{DefaultRandom, Environment, InfoLogger, Parallelism, Random};
use std::sync::Arc;


pub fn create_test_environment() -> Arc<Environment> {
    create_test_environment_with_random(Arc::new(DefaultRandom::new_repeatable(0)))
}

pub fn create_test_environment_with_random(random: Arc<dyn Random + Send + Sync>) -> Arc<Environment> {
    Arc::new(Environment::new(random, None, Parallelism::new(2), Arc::new(|_| {})))
}

pub fn create_test_environment_with_logger(logger: InfoLogger) -> Arc<Environment> {
    Arc::new(Environment::new(Arc::new(DefaultRandom::new_repeatable(0)), None, Parallelism::new(2), logger))
}
