// src/mc/mc_engine.rs
//! Monte Carlo estimator for European options under GBM
//!
//! # Estimator
//!
//! Given N terminal prices S_T^(i):
//! ```text
//! Y_i   = e^(-rT) * payoff(S_T^(i))
//! price = (1/N) Σ Y_i
//! s²    = 1/(N-1) Σ (Y_i - price)²
//! SE    = s / √N
//! CI95  = price ± 1.96 * SE
//! ```
//!
//! The error shrinks like 1/√N: four times the paths halves the standard error.
//!
//! # Single sample
//!
//! With N = 1 the sample variance has no degrees of freedom. The estimator
//! reports SE = 0 and a zero-width interval, and flags the result through
//! [`PricingResult::is_single_sample`].
//!
//! # Parallel reduction
//!
//! [`PayoffStats`] accumulates count, mean and the sum of squared deviations
//! (Welford) and merges pairwise (Chan et al.), so chunks simulated on
//! different threads combine without materialising every payoff.

use crate::config::OptionSpec;
use crate::error::{validation::validate_count, PricingError, PricingResultT};
use crate::mc::payoffs::Payoff;
use crate::models::gbm::{Gbm, SimulatedPaths};
use crate::rng::{NormalSource, RngFactory};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// Two-sided 95% normal quantile
pub const Z_95: f64 = 1.96;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }
}

/// Monte Carlo price estimate from one realised sample
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PricingResult {
    pub estimated_price: f64,
    pub standard_error: f64,
    pub confidence_interval_95: ConfidenceInterval,
    /// Sample standard deviation of the discounted payoffs (N-1 denominator)
    pub sample_std_dev: f64,
    pub num_samples: usize,
}

impl PricingResult {
    /// SE and CI carry no information when only one path was drawn
    pub fn is_single_sample(&self) -> bool {
        self.num_samples == 1
    }
}

/// Streaming mean/variance accumulator with a stable pairwise merge
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PayoffStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl PayoffStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(values: &[f64]) -> Self {
        let mut stats = Self::new();
        for &v in values {
            stats.push(v);
        }
        stats
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Combine two disjoint samples
    pub fn merge(&self, other: &PayoffStats) -> PayoffStats {
        if self.count == 0 {
            return *other;
        }
        if other.count == 0 {
            return *self;
        }
        let count = self.count + other.count;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let delta = other.mean - self.mean;
        let mean = self.mean + delta * n_b / count as f64;
        let m2 = self.m2 + other.m2 + delta * delta * n_a * n_b / count as f64;
        PayoffStats { count, mean, m2 }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance; 0 for fewer than two observations
    pub fn sample_variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).max(0.0)
        }
    }

    /// Turn accumulated discounted payoffs into a price estimate
    pub fn to_pricing_result(&self) -> PricingResultT<PricingResult> {
        if self.count == 0 {
            return Err(PricingError::invalid_config(
                "num_simulations",
                "cannot estimate a price from an empty sample",
            ));
        }
        if self.count == 1 {
            warn!("single simulated path: standard error reported as 0");
        }

        let sample_std_dev = self.sample_variance().sqrt();
        let standard_error = sample_std_dev / (self.count as f64).sqrt();
        let margin = Z_95 * standard_error;

        Ok(PricingResult {
            estimated_price: self.mean,
            standard_error,
            confidence_interval_95: ConfidenceInterval {
                low: self.mean - margin,
                high: self.mean + margin,
            },
            sample_std_dev,
            num_samples: self.count,
        })
    }
}

/// Discounted payoff of every terminal price
pub fn discounted_payoffs(terminal_prices: &[f64], spec: &OptionSpec) -> Vec<f64> {
    let payoff = Payoff::from_spec(spec);
    let discount = spec.discount_factor();
    terminal_prices
        .iter()
        .map(|&s_t| discount * payoff.calculate(s_t))
        .collect()
}

/// Estimate the price from a sample of terminal prices
///
/// # Errors
///
/// `InvalidConfiguration` for an empty sample.
pub fn mc_estimate(terminal_prices: &[f64], spec: &OptionSpec) -> PricingResultT<PricingResult> {
    PayoffStats::from_slice(&discounted_payoffs(terminal_prices, spec)).to_pricing_result()
}

/// Estimate the price from full paths, using only each terminal point
pub fn mc_estimate_from_paths(
    paths: &SimulatedPaths,
    spec: &OptionSpec,
) -> PricingResultT<PricingResult> {
    mc_estimate(&paths.terminal_prices(), spec)
}

/// Sequential terminal-only pricing with a caller-supplied normal source
pub fn mc_price_european<N: NormalSource + ?Sized>(
    spec: &OptionSpec,
    num_simulations: usize,
    normals: &mut N,
) -> PricingResultT<PricingResult> {
    validate_count("num_simulations", num_simulations)?;
    spec.validate()?;

    let terminal_prices = Gbm::risk_neutral(spec).sample_terminal_prices(
        spec.time_to_expiration,
        num_simulations,
        normals,
    );
    mc_estimate(&terminal_prices, spec)
}

/// Terminal-only pricing partitioned over the rayon pool
///
/// Paths are split into chunks of `chunk_size`; chunk `i` draws from
/// substream `i` of `factory`. Per-chunk statistics are collected in chunk
/// order and merged sequentially, so the result is bit-identical for a given
/// seed and chunk size whatever the thread count.
pub fn mc_price_european_parallel(
    spec: &OptionSpec,
    num_simulations: usize,
    factory: &RngFactory,
    chunk_size: usize,
) -> PricingResultT<PricingResult> {
    validate_count("num_simulations", num_simulations)?;
    validate_count("chunk_size", chunk_size)?;
    spec.validate()?;

    let gbm = Gbm::risk_neutral(spec);
    let payoff = Payoff::from_spec(spec);
    let discount = spec.discount_factor();
    let t = spec.time_to_expiration;
    let drift = (gbm.mu - 0.5 * gbm.sigma * gbm.sigma) * t;
    let vol_sqrt_t = gbm.sigma * t.sqrt();

    let num_chunks = num_simulations.div_ceil(chunk_size);
    debug!(
        num_simulations,
        chunk_size,
        num_chunks,
        base_seed = factory.base_seed(),
        "parallel Monte Carlo run"
    );

    let chunk_stats: Vec<PayoffStats> = (0..num_chunks)
        .into_par_iter()
        .map(|chunk| {
            let start = chunk * chunk_size;
            let len = chunk_size.min(num_simulations - start);
            let mut normals = factory.stream(chunk as u64);
            let mut stats = PayoffStats::new();
            for _ in 0..len {
                let s_t = gbm.s0 * (drift + vol_sqrt_t * normals.next_normal()).exp();
                stats.push(discount * payoff.calculate(s_t));
            }
            stats
        })
        .collect();

    chunk_stats
        .iter()
        .fold(PayoffStats::new(), |acc, s| acc.merge(s))
        .to_pricing_result()
}
