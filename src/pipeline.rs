// src/pipeline.rs
//! Pricing pipeline: Monte Carlo estimate vs. Black-Scholes
//!
//! The single entry point for front ends. Inputs are validated up front;
//! nothing is simulated for an invalid configuration and no partial report
//! is ever produced.
//!
//! ```rust
//! use gbm_option_pricer::config::{OptionSpec, SimulationConfig};
//! use gbm_option_pricer::pipeline::price_option;
//!
//! let report = price_option(&OptionSpec::default(), &SimulationConfig::default())
//!     .expect("valid inputs");
//! println!(
//!     "MC {:.4} ± {:.4}, BS {:.4}",
//!     report.monte_carlo.estimated_price,
//!     report.monte_carlo.standard_error,
//!     report.analytic.theoretical_price,
//! );
//! ```

use crate::analytics::bs_analytic::{black_scholes, AnalyticResult};
use crate::config::{OptionSpec, SimulationConfig};
use crate::error::PricingResultT;
use crate::math_utils::Timer;
use crate::mc::mc_engine::{
    mc_estimate, mc_estimate_from_paths, mc_price_european_parallel, PricingResult,
};
use crate::mc::payoffs::Payoff;
use crate::models::gbm::{generate_paths, generate_terminal_prices, SimulatedPaths};
use crate::rng::{GaussianRng, NormalSource, RngFactory};
use serde::Serialize;
use tracing::{debug, info};

/// Everything a renderer needs about one pricing run
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonReport {
    pub option: OptionSpec,
    pub simulation: SimulationConfig,
    pub monte_carlo: PricingResult,
    pub analytic: AnalyticResult,
    /// |estimated - theoretical|
    pub absolute_difference: f64,
    /// 100 · absolute_difference / theoretical, or 0 when the theoretical price is 0
    pub percentage_difference: f64,
}

impl ComparisonReport {
    pub fn new(
        option: OptionSpec,
        simulation: SimulationConfig,
        monte_carlo: PricingResult,
        analytic: AnalyticResult,
    ) -> Self {
        let absolute_difference = (monte_carlo.estimated_price - analytic.theoretical_price).abs();
        let percentage_difference = if analytic.theoretical_price != 0.0 {
            100.0 * absolute_difference / analytic.theoretical_price
        } else {
            0.0
        };

        ComparisonReport {
            option,
            simulation,
            monte_carlo,
            analytic,
            absolute_difference,
            percentage_difference,
        }
    }

    /// Whether the closed-form price lies inside the Monte Carlo 95% interval
    pub fn analytic_within_ci(&self) -> bool {
        self.monte_carlo
            .confidence_interval_95
            .contains(self.analytic.theoretical_price)
    }
}

/// Full-path run for visualisation
#[derive(Clone, Debug)]
pub struct PathPricing {
    pub report: ComparisonReport,
    pub paths: SimulatedPaths,
    /// Undiscounted payoff of each path
    pub payoffs: Vec<f64>,
}

fn validate_inputs(spec: &OptionSpec, cfg: &SimulationConfig) -> PricingResultT<()> {
    spec.validate()?;
    cfg.validate()
}

fn finish(
    spec: &OptionSpec,
    cfg: &SimulationConfig,
    monte_carlo: PricingResult,
    timer: &Timer,
) -> ComparisonReport {
    let analytic = black_scholes(spec);
    let report = ComparisonReport::new(*spec, cfg.clone(), monte_carlo, analytic);
    info!(
        option_type = %spec.option_type,
        paths = cfg.num_simulations,
        mc_price = report.monte_carlo.estimated_price,
        std_error = report.monte_carlo.standard_error,
        bs_price = report.analytic.theoretical_price,
        pct_diff = report.percentage_difference,
        elapsed_ms = timer.elapsed_ms(),
        "priced option"
    );
    report
}

/// Price in terminal-only mode
///
/// Uses the partitioned estimator when `cfg.parallel` is set. A fixed
/// `random_seed` makes the report reproducible.
pub fn price_option(spec: &OptionSpec, cfg: &SimulationConfig) -> PricingResultT<ComparisonReport> {
    validate_inputs(spec, cfg)?;

    if cfg.parallel {
        let timer = Timer::new();
        let factory = RngFactory::from_seed(cfg.random_seed);
        let monte_carlo =
            mc_price_european_parallel(spec, cfg.num_simulations, &factory, cfg.chunk_size)?;
        return Ok(finish(spec, cfg, monte_carlo, &timer));
    }

    let mut normals = GaussianRng::from_seed(cfg.random_seed);
    price_option_with_normals(spec, cfg, &mut normals)
}

/// Terminal-only pricing drawing from a caller-owned normal source
///
/// `cfg.random_seed` and `cfg.parallel` are ignored; randomness comes
/// entirely from `normals`.
pub fn price_option_with_normals<N: NormalSource + ?Sized>(
    spec: &OptionSpec,
    cfg: &SimulationConfig,
    normals: &mut N,
) -> PricingResultT<ComparisonReport> {
    validate_inputs(spec, cfg)?;
    let timer = Timer::new();

    let terminal_prices = generate_terminal_prices(spec, cfg, normals);
    debug!(paths = terminal_prices.len(), "sampled terminal prices");
    let monte_carlo = mc_estimate(&terminal_prices, spec)?;

    Ok(finish(spec, cfg, monte_carlo, &timer))
}

/// Price in full-path mode, keeping the paths and payoffs for plotting
///
/// Always sequential. Draws differ from terminal-only mode, so the estimate
/// for the same seed differs from [`price_option`].
pub fn price_option_with_paths(
    spec: &OptionSpec,
    cfg: &SimulationConfig,
) -> PricingResultT<PathPricing> {
    validate_inputs(spec, cfg)?;
    let timer = Timer::new();

    let mut normals = GaussianRng::from_seed(cfg.random_seed);
    let paths = generate_paths(spec, cfg, &mut normals);
    debug!(
        paths = paths.num_paths(),
        steps = paths.num_steps(),
        "simulated full paths"
    );

    let monte_carlo = mc_estimate_from_paths(&paths, spec)?;
    let payoffs = Payoff::from_spec(spec).calculate_all(&paths.terminal_prices());
    let report = finish(spec, cfg, monte_carlo, &timer);

    Ok(PathPricing {
        report,
        paths,
        payoffs,
    })
}
