//! Collects search statistics and writes progress information into log.

#[cfg(test)]
#[path = "../../tests/unit/solver/telemetry_test.rs"]
mod telemetry_test;

use crate::models::solution::{Candidate, ObjectiveVector};
use crate::utils::{Float, InfoLogger, Timer};

/// Encapsulates measurements of a search run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TelemetryMetrics {
    /// Search duration in milliseconds.
    pub duration: usize,
    /// Total amount of generations or exact path levels explored.
    pub generations: usize,
    /// Amount of decoded and evaluated solutions.
    pub evaluated: usize,
    /// Amount of infeasible candidates dropped.
    pub discarded: usize,
    /// Speed: generations per second.
    pub speed: Float,
}

/// Specifies a telemetry mode.
#[derive(Clone)]
pub enum TelemetryMode {
    /// No telemetry at all.
    None,
    /// Only logging.
    OnlyLogging {
        /// A logger type.
        logger: InfoLogger,
        /// Specifies how often the best solution is logged.
        log_best: usize,
    },
}

/// Provides way to collect metrics and write information into log.
pub struct Telemetry {
    metrics: TelemetryMetrics,
    time: Timer,
    mode: TelemetryMode,
}

impl Telemetry {
    /// Creates a new instance of `Telemetry`.
    pub fn new(mode: TelemetryMode) -> Self {
        Self { metrics: TelemetryMetrics::default(), time: Timer::start(), mode }
    }

    /// Reports initial seeds.
    pub fn on_initial(&mut self, seeds: &[Candidate], item_time: Timer) {
        self.metrics.evaluated += seeds.len();

        if let Some(best) = seeds.first() {
            self.log(&format!(
                "[{}s] created {} initial seed(s) in {}ms, greedy: {}",
                self.time.elapsed_secs(),
                seeds.len(),
                item_time.elapsed_millis(),
                format_candidate(best)
            ));
        }
    }

    /// Reports generation statistics.
    pub fn on_generation(&mut self, generation: usize, front: &[Candidate], evaluated: usize, discarded: usize) {
        self.metrics.generations = generation;
        self.metrics.evaluated += evaluated;
        self.metrics.discarded += discarded;

        let log_best = match &self.mode {
            TelemetryMode::None => return,
            TelemetryMode::OnlyLogging { log_best, .. } => *log_best,
        };

        if log_best > 0 && generation % log_best == 0 {
            if let Some(best) = front.first() {
                self.log(&format!(
                    "[{}s] generation {generation}: front size {}, first: {}",
                    self.time.elapsed_secs(),
                    front.len(),
                    format_candidate(best)
                ));
            }
        }
    }

    /// Reports final statistics and returns collected metrics.
    pub fn on_result(&mut self, method: &str, front: &[Candidate], budget_exceeded: bool) -> TelemetryMetrics {
        let elapsed = self.time.elapsed_secs_as_float();

        self.metrics.duration = self.time.elapsed_millis() as usize;
        self.metrics.speed = if elapsed > 0. { self.metrics.generations as Float / elapsed } else { 0. };

        self.log(&format!(
            "[{}s] {method} search finished: {} generation(s), {} evaluated, {} discarded, front size {}{}",
            self.time.elapsed_secs(),
            self.metrics.generations,
            self.metrics.evaluated,
            self.metrics.discarded,
            front.len(),
            if budget_exceeded { ", budget exceeded" } else { "" }
        ));

        self.metrics.clone()
    }

    /// Writes log message if logging is enabled.
    pub fn log(&self, message: &str) {
        if let TelemetryMode::OnlyLogging { logger, .. } = &self.mode {
            (logger)(message)
        }
    }
}

fn format_candidate(candidate: &Candidate) -> String {
    let ObjectiveVector { cost, delay_penalty, utilization, demurrage } = &candidate.objectives;

    format!(
        "deferred: {}, rakes: {}, cost: {cost:.2}, delay: {delay_penalty:.2}, utilization: {utilization:.3}, demurrage: {demurrage:.2}",
        candidate.deferred_count(),
        candidate.solution.compositions.len()
    )
}
