//! # gbm-option-pricer: Monte Carlo vs. Black-Scholes for European Options
//!
//! Estimates the fair value of a European call or put by simulating the
//! underlying under Geometric Brownian Motion, averaging discounted payoffs,
//! and cross-checking the estimate against the closed-form Black-Scholes price.
//!
//! ## Key Features
//!
//! - **Exact GBM sampling**: terminal prices in one step, or full time-stepped paths
//! - **Honest error bars**: standard error and 95% confidence interval per run
//! - **Reproducible**: explicit, seedable normal sources; no global RNG
//! - **Parallel**: chunked simulation on Rayon with a stable mean/variance merge
//! - **Validated inputs**: invalid contracts fail before any simulation work
//!
//! ## Quick Start
//!
//! ```rust
//! use gbm_option_pricer::config::{OptionSpec, OptionType, SimulationConfig};
//! use gbm_option_pricer::pipeline::price_option;
//!
//! let spec = OptionSpec::new(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call)
//!     .expect("valid contract");
//! let cfg = SimulationConfig {
//!     num_simulations: 20_000,
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let report = price_option(&spec, &cfg).expect("valid configuration");
//! println!(
//!     "MC {:.4} (SE {:.4}) vs BS {:.4}",
//!     report.monte_carlo.estimated_price,
//!     report.monte_carlo.standard_error,
//!     report.analytic.theoretical_price,
//! );
//! ```
//!
//! ## Mathematical Foundation
//!
//! Under the risk-neutral measure the price of a European payoff is
//! `e^(-rT) E[payoff(S_T)]`. The Monte Carlo estimator samples `S_T` from the
//! exact log-normal law of GBM, so its only error is statistical and shrinks
//! like `1/√N`.

// Module declarations
pub mod analytics;
pub mod config;
pub mod error;
pub mod market_data;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod rng;

// Re-export commonly used types for convenience
pub use config::{OptionSpec, OptionType, PricerConfig, SimulationConfig};
pub use error::{PricingError, PricingResultT};
pub use pipeline::{price_option, ComparisonReport};
