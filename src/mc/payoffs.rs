//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! - **Call**: max(S_T - K, 0) - right to buy at strike K
//! - **Put**: max(K - S_T, 0) - right to sell at strike K
//!
//! # Implementation Notes
//!
//! Payoffs are pure functions of the terminal price. Full simulated paths
//! are reduced to their last point before evaluation.

use crate::config::{OptionSpec, OptionType};

/// European vanilla payoff
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payoff {
    /// European call option: max(S_T - K, 0)
    EuropeanCall { k: f64 },

    /// European put option: max(K - S_T, 0)
    EuropeanPut { k: f64 },
}

impl Payoff {
    pub fn new(option_type: OptionType, strike: f64) -> Self {
        match option_type {
            OptionType::Call => Payoff::EuropeanCall { k: strike },
            OptionType::Put => Payoff::EuropeanPut { k: strike },
        }
    }

    pub fn from_spec(spec: &OptionSpec) -> Self {
        Self::new(spec.option_type, spec.strike_price)
    }

    /// Intrinsic value at expiry for terminal price `s_t`
    pub fn calculate(&self, s_t: f64) -> f64 {
        match self {
            Payoff::EuropeanCall { k } => (s_t - k).max(0.0),
            Payoff::EuropeanPut { k } => (k - s_t).max(0.0),
        }
    }

    /// Payoff on the terminal point of a path; an empty path pays nothing
    pub fn calculate_path(&self, path: &[f64]) -> f64 {
        path.last().map_or(0.0, |&s_t| self.calculate(s_t))
    }

    /// Elementwise payoff over a sample of terminal prices
    pub fn calculate_all(&self, terminal_prices: &[f64]) -> Vec<f64> {
        terminal_prices.iter().map(|&s| self.calculate(s)).collect()
    }
}

/// Payoff of a single terminal price for the given option type
pub fn option_payoff(s_t: f64, strike: f64, option_type: OptionType) -> f64 {
    Payoff::new(option_type, strike).calculate(s_t)
}
