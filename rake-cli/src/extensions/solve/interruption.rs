//! Interruption handler.

#[cfg(test)]
#[path = "../../../tests/unit/extensions/solve/interruption_test.rs"]
mod interruption_test;

use rake_core::prelude::{Float, GenericError, Quota};
use rake_core::utils::TimeQuota;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Creates a quota which is reached on Ctrl-C or when optional time limit in seconds is exceeded.
pub fn create_interruption_quota(max_time: Option<Float>) -> Result<Arc<dyn Quota + Send + Sync>, GenericError> {
    let should_interrupt = Arc::new(AtomicBool::new(false));

    ctrlc::set_handler({
        let should_interrupt = should_interrupt.clone();
        move || {
            should_interrupt.store(true, Ordering::Relaxed);
        }
    })
    .map_err(|err| format!("cannot set interruption handler: {err}"))?;

    Ok(Arc::new(InterruptionQuota::new(max_time, should_interrupt)))
}

struct InterruptionQuota {
    inner: Option<Arc<dyn Quota + Send + Sync>>,
    should_interrupt: Arc<AtomicBool>,
}

impl InterruptionQuota {
    fn new(max_time: Option<Float>, should_interrupt: Arc<AtomicBool>) -> Self {
        let inner = max_time.map::<Arc<dyn Quota + Send + Sync>, _>(|time| Arc::new(TimeQuota::new(time)));
        Self { inner, should_interrupt }
    }
}

impl Quota for InterruptionQuota {
    fn is_reached(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.is_reached()) || self.should_interrupt.load(Ordering::Relaxed)
    }
}
