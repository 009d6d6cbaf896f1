#[cfg(test)]
#[path = "../../tests/unit/scenarios/distribution_test.rs"]
mod distribution_test;

use crate::utils::{Float, GenericResult};
use rand::Rng;
use rand_distr::{Distribution as _, Exp, LogNormal, Normal, Triangular};

/// A probability distribution of a perturbation.
#[derive(Clone, Debug, PartialEq)]
pub enum Distribution {
    /// Always the same value.
    Fixed(Float),
    /// Uniform distribution on [min, max].
    Uniform {
        /// Minimum value.
        min: Float,
        /// Maximum value.
        max: Float,
    },
    /// Normal distribution.
    Normal {
        /// Mean.
        mean: Float,
        /// Standard deviation.
        std_dev: Float,
    },
    /// Log-normal distribution parametrized by the underlying normal distribution.
    LogNormal {
        /// Mean of the underlying normal distribution.
        mu: Float,
        /// Standard deviation of the underlying normal distribution.
        sigma: Float,
    },
    /// Exponential distribution.
    Exponential {
        /// Rate (lambda).
        rate: Float,
    },
    /// Triangular distribution.
    Triangular {
        /// Minimum value.
        min: Float,
        /// The most likely value.
        mode: Float,
        /// Maximum value.
        max: Float,
    },
}

impl Distribution {
    /// Checks distribution parameters.
    pub fn validate(&self) -> GenericResult<()> {
        let is_valid = match *self {
            Distribution::Fixed(value) => value.is_finite(),
            Distribution::Uniform { min, max } => min.is_finite() && max.is_finite() && min <= max,
            Distribution::Normal { mean, std_dev } => mean.is_finite() && std_dev.is_finite() && std_dev >= 0.,
            Distribution::LogNormal { mu, sigma } => mu.is_finite() && sigma.is_finite() && sigma >= 0.,
            Distribution::Exponential { rate } => rate.is_finite() && rate > 0.,
            Distribution::Triangular { min, mode, max } => {
                min.is_finite() && max.is_finite() && min <= mode && mode <= max
            }
        };

        if is_valid { Ok(()) } else { Err(format!("invalid distribution parameters: {self:?}").into()) }
    }

    /// Returns a mean value of the distribution.
    pub fn mean(&self) -> Float {
        match *self {
            Distribution::Fixed(value) => value,
            Distribution::Uniform { min, max } => (min + max) / 2.,
            Distribution::Normal { mean, .. } => mean,
            Distribution::LogNormal { mu, sigma } => (mu + sigma * sigma / 2.).exp(),
            Distribution::Exponential { rate } => 1. / rate,
            Distribution::Triangular { min, mode, max } => (min + mode + max) / 3.,
        }
    }

    /// Draws a sample, falls back to the mean when parameters are degenerate.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Float {
        match *self {
            Distribution::Fixed(value) => value,
            Distribution::Uniform { min, max } if min < max => rng.gen_range(min..=max),
            Distribution::Normal { mean, std_dev } => Normal::new(mean, std_dev).map_or(mean, |d| d.sample(rng)),
            Distribution::LogNormal { mu, sigma } => LogNormal::new(mu, sigma).map_or(self.mean(), |d| d.sample(rng)),
            Distribution::Exponential { rate } => Exp::new(rate).map_or(self.mean(), |d| d.sample(rng)),
            Distribution::Triangular { min, mode, max } if min < max => {
                Triangular::new(min, max, mode).map_or(mode, |d| d.sample(rng))
            }
            _ => self.mean(),
        }
    }
}
