// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! For European options, this has closed-form solutions involving
//! the cumulative normal distribution function Φ(x).
//!
//! # Degenerate volatility
//!
//! When σ√T = 0 the terminal price is the forward S·e^(rT) with certainty
//! and d₁, d₂ are undefined. The price is then the discounted intrinsic
//! value of the forward.

use crate::config::{OptionSpec, OptionType};
use crate::math_utils::norm_cdf;
use serde::Serialize;
use tracing::warn;

/// Closed-form price of one contract
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AnalyticResult {
    pub theoretical_price: f64,
    /// `None` when σ√T = 0
    pub d1: Option<f64>,
    pub d2: Option<f64>,
}

/// d₁ and d₂, or `None` when σ√T is zero
///
/// # Formula
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
pub fn d1_d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> Option<(f64, f64)> {
    let vol_sqrt_t = sigma * t.max(0.0).sqrt();
    if vol_sqrt_t <= 0.0 {
        return None;
    }
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    Some((d1, d1 - vol_sqrt_t))
}

/// Discounted intrinsic value of the forward, the σ√T = 0 limit
fn deterministic_price(s: f64, k: f64, r: f64, t: f64, option_type: OptionType) -> f64 {
    let discount = (-r * t).exp();
    let forward = s * (r * t).exp();
    match option_type {
        OptionType::Call => discount * (forward - k).max(0.0),
        OptionType::Put => discount * (k - forward).max(0.0),
    }
}

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// # Parameters
/// - `s`: Current stock price
/// - `k`: Strike price
/// - `r`: Risk-free rate
/// - `sigma`: Volatility
/// - `t`: Time to expiration
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    match d1_d2(s, k, r, sigma, t) {
        Some((d1, d2)) => s * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2),
        None => deterministic_price(s, k, r, t, OptionType::Call),
    }
}

/// Black-Scholes European put option price
///
/// # Formula
/// ```text
/// P(S,K,r,σ,T) = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    match d1_d2(s, k, r, sigma, t) {
        Some((d1, d2)) => k * (-r * t).exp() * norm_cdf(-d2) - s * norm_cdf(-d1),
        None => deterministic_price(s, k, r, t, OptionType::Put),
    }
}

/// Price a validated contract
pub fn black_scholes(spec: &OptionSpec) -> AnalyticResult {
    let (s, k, r, sigma, t) = (
        spec.spot_price,
        spec.strike_price,
        spec.risk_free_rate,
        spec.volatility,
        spec.time_to_expiration,
    );

    let d = d1_d2(s, k, r, sigma, t);
    if d.is_none() {
        warn!(sigma, t, "zero volatility, pricing the deterministic forward payoff");
    }

    let theoretical_price = match spec.option_type {
        OptionType::Call => bs_call_price(s, k, r, sigma, t),
        OptionType::Put => bs_put_price(s, k, r, sigma, t),
    };

    AnalyticResult {
        // Φ rounding can push deep out-of-the-money prices a hair below zero
        theoretical_price: theoretical_price.max(0.0),
        d1: d.map(|(d1, _)| d1),
        d2: d.map(|(_, d2)| d2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_call_and_put() {
        let spec = OptionSpec::default();
        let call = black_scholes(&spec);
        assert_abs_diff_eq!(call.theoretical_price, 10.450_583_572_185_565, epsilon = 1e-9);
        assert_abs_diff_eq!(call.d1.unwrap(), 0.35, epsilon = 1e-12);
        assert_abs_diff_eq!(call.d2.unwrap(), 0.15, epsilon = 1e-12);

        let put = black_scholes(&spec.with_option_type(OptionType::Put));
        assert_abs_diff_eq!(put.theoretical_price, 5.573_526_022_256_971, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_volatility_uses_forward_payoff() {
        let spec = OptionSpec {
            volatility: 0.0,
            ..OptionSpec::default()
        };
        let call = black_scholes(&spec);
        assert!(call.d1.is_none() && call.d2.is_none());
        // S - K·e^{-rT}
        assert_abs_diff_eq!(
            call.theoretical_price,
            100.0 - 100.0 * (-0.05f64).exp(),
            epsilon = 1e-12
        );

        let put = black_scholes(&spec.with_option_type(OptionType::Put));
        assert_eq!(put.theoretical_price, 0.0);

        let otm_call = black_scholes(&OptionSpec {
            strike_price: 120.0,
            ..spec
        });
        assert_eq!(otm_call.theoretical_price, 0.0);
    }

    #[test]
    fn test_expired_contract_is_intrinsic() {
        assert_abs_diff_eq!(bs_call_price(110.0, 100.0, 0.05, 0.2, 0.0), 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(bs_put_price(90.0, 100.0, 0.05, 0.2, 0.0), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_small_volatility_approaches_deterministic_limit() {
        let limit = 100.0 - 90.0 * (-0.05f64).exp();
        let near = bs_call_price(100.0, 90.0, 0.05, 1e-6, 1.0);
        assert_abs_diff_eq!(near, limit, epsilon = 1e-8);
    }
}
