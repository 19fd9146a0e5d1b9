// src/models/gbm.rs
//! Geometric Brownian Motion path generator
//!
//! # Mathematical Framework
//!
//! Under the risk-neutral measure the asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! which has the exact solution over any interval Δt:
//! ```text
//! S_{t+Δt} = S_t * exp((r - σ²/2)Δt + σ√Δt * Z),   Z ~ N(0,1)
//! ```
//!
//! Because the update is exact, no discretisation bias is introduced: a
//! single step of length T gives the terminal distribution directly, and
//! M steps of T/M only matter when the intermediate prices are wanted.
//! Every generated price is strictly positive.

use crate::config::{OptionSpec, SimulationConfig};
use crate::rng::NormalSource;
use ndarray::{Array2, ArrayView1, Axis};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gbm {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, mu: f64, sigma: f64) -> Self {
        Gbm { s0, mu, sigma }
    }

    /// Risk-neutral dynamics for a contract: drift is the risk-free rate
    pub fn risk_neutral(spec: &OptionSpec) -> Self {
        Gbm::new(spec.spot_price, spec.risk_free_rate, spec.volatility)
    }

    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        s_t * ((self.mu - 0.5 * self.sigma * self.sigma) * dt
            + self.sigma * dt.sqrt() * normal_draw)
            .exp()
    }

    /// Draw `num_paths` i.i.d. terminal prices at horizon `t`, one normal per path
    pub fn sample_terminal_prices<N: NormalSource + ?Sized>(
        &self,
        t: f64,
        num_paths: usize,
        normals: &mut N,
    ) -> Vec<f64> {
        let drift = (self.mu - 0.5 * self.sigma * self.sigma) * t;
        let vol_sqrt_t = self.sigma * t.sqrt();

        (0..num_paths)
            .map(|_| self.s0 * (drift + vol_sqrt_t * normals.next_normal()).exp())
            .collect()
    }

    /// Simulate `num_paths` full trajectories of `num_steps` exact steps each
    ///
    /// Draws are consumed path by path, step by step.
    pub fn simulate_paths<N: NormalSource + ?Sized>(
        &self,
        t: f64,
        num_steps: usize,
        num_paths: usize,
        normals: &mut N,
    ) -> SimulatedPaths {
        let dt = t / num_steps as f64;
        let mut prices = Array2::<f64>::zeros((num_paths, num_steps + 1));
        let mut draws = vec![0.0; num_steps];

        for mut path in prices.axis_iter_mut(Axis(0)) {
            normals.fill_normals(&mut draws);
            let mut current_s = self.s0;
            path[0] = current_s;
            for (k, &z) in draws.iter().enumerate() {
                current_s = self.exact_step(current_s, dt, z);
                path[k + 1] = current_s;
            }
        }

        SimulatedPaths { prices }
    }
}

/// N simulated trajectories of M+1 prices, each starting at S0
#[derive(Clone, Debug)]
pub struct SimulatedPaths {
    prices: Array2<f64>,
}

impl SimulatedPaths {
    pub fn num_paths(&self) -> usize {
        self.prices.nrows()
    }

    /// Number of time steps M (points per path minus one)
    pub fn num_steps(&self) -> usize {
        self.prices.ncols().saturating_sub(1)
    }

    pub fn path(&self, i: usize) -> ArrayView1<'_, f64> {
        self.prices.row(i)
    }

    /// Last point of every path
    pub fn terminal_prices(&self) -> Vec<f64> {
        match self.prices.ncols() {
            0 => Vec::new(),
            n => self.prices.column(n - 1).to_vec(),
        }
    }

    /// Raw (paths × points) matrix
    pub fn as_array(&self) -> &Array2<f64> {
        &self.prices
    }
}

/// Terminal-only mode for a contract and simulation configuration
pub fn generate_terminal_prices<N: NormalSource + ?Sized>(
    spec: &OptionSpec,
    cfg: &SimulationConfig,
    normals: &mut N,
) -> Vec<f64> {
    Gbm::risk_neutral(spec).sample_terminal_prices(
        spec.time_to_expiration,
        cfg.num_simulations,
        normals,
    )
}

/// Full-path mode for a contract and simulation configuration
pub fn generate_paths<N: NormalSource + ?Sized>(
    spec: &OptionSpec,
    cfg: &SimulationConfig,
    normals: &mut N,
) -> SimulatedPaths {
    Gbm::risk_neutral(spec).simulate_paths(
        spec.time_to_expiration,
        cfg.num_steps,
        cfg.num_simulations,
        normals,
    )
}
