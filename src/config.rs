// src/config.rs
//! Option contract and simulation settings
//!
//! All inputs to the pricer are plain immutable values passed explicitly into
//! the pipeline. Defaults reproduce the reference setup: an at-the-money one
//! year call on a 100 spot with 5% rates and 20% volatility, priced with
//! 10,000 paths of 252 daily steps.
//!
//! A [`PricerConfig`] can be loaded from TOML; omitted keys fall back to the
//! defaults:
//!
//! ```toml
//! [option]
//! spot_price = 105.0
//! option_type = "put"
//!
//! [simulation]
//! num_simulations = 50000
//! random_seed = 7
//! ```

use crate::error::{validation::*, PricingError, PricingResultT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(PricingError::invalid_config(
                "option_type",
                format!("unknown option type '{}', use 'call' or 'put'", other),
            )),
        }
    }
}

/// European option contract under Black-Scholes dynamics
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionSpec {
    pub spot_price: f64,         // S0
    pub strike_price: f64,       // K
    pub time_to_expiration: f64, // T in years
    pub risk_free_rate: f64,     // r
    pub volatility: f64,         // sigma, annualized
    pub option_type: OptionType,
}

impl OptionSpec {
    pub fn new(
        spot_price: f64,
        strike_price: f64,
        time_to_expiration: f64,
        risk_free_rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> PricingResultT<Self> {
        let spec = OptionSpec {
            spot_price,
            strike_price,
            time_to_expiration,
            risk_free_rate,
            volatility,
            option_type,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Validate the contract parameters
    pub fn validate(&self) -> PricingResultT<()> {
        validate_positive("spot_price", self.spot_price)?;
        validate_positive("strike_price", self.strike_price)?;
        validate_positive("time_to_expiration", self.time_to_expiration)?;
        validate_finite("risk_free_rate", self.risk_free_rate)?;
        validate_non_negative("volatility", self.volatility)?;
        Ok(())
    }

    /// e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_expiration).exp()
    }

    /// Same contract with the other side (call <-> put)
    pub fn with_option_type(&self, option_type: OptionType) -> Self {
        OptionSpec {
            option_type,
            ..*self
        }
    }
}

impl Default for OptionSpec {
    fn default() -> Self {
        OptionSpec {
            spot_price: 100.0,
            strike_price: 100.0,
            time_to_expiration: 1.0,
            risk_free_rate: 0.05,
            volatility: 0.20,
            option_type: OptionType::Call,
        }
    }
}

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_simulations: usize,
    /// Time steps per path; only used when full paths are produced
    pub num_steps: usize,
    /// `None` draws a fresh seed from OS entropy
    pub random_seed: Option<u64>,
    /// Partition the paths over the rayon pool
    pub parallel: bool,
    /// Paths per independently seeded chunk in parallel mode
    pub chunk_size: usize,
}

impl SimulationConfig {
    pub fn validate(&self) -> PricingResultT<()> {
        validate_count("num_simulations", self.num_simulations)?;
        validate_count("num_steps", self.num_steps)?;
        validate_count("chunk_size", self.chunk_size)?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_simulations: 10_000,
            num_steps: 252,
            random_seed: Some(42),
            parallel: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// File-loadable bundle of both inputs
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricerConfig {
    pub option: OptionSpec,
    pub simulation: SimulationConfig,
}

impl PricerConfig {
    pub fn from_toml_str(contents: &str) -> PricingResultT<Self> {
        let cfg: PricerConfig =
            toml::from_str(contents).map_err(|e| PricingError::ConfigParse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PricingResultT<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> PricingResultT<()> {
        self.option.validate()?;
        self.simulation.validate()
    }
}
