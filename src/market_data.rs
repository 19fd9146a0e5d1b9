// src/market_data.rs
//! Historical volatility from a closing-price series
//!
//! ```text
//! r_i = ln(P_i / P_{i-1})
//! σ   = stdev(r) * √A        (A = observations per year, 252 for daily)
//! ```
//!
//! Prices are read from local data only; nothing here touches the network.

use crate::error::{validation::validate_positive, PricingError, PricingResultT};
use statrs::statistics::Statistics;
use std::path::Path;
use tracing::debug;

/// Trading days per year
pub const DAILY_ANNUALIZATION: f64 = 252.0;

/// Log returns of consecutive prices
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}

/// Annualized volatility: sample std-dev of log returns times √annualization
///
/// # Errors
///
/// `InsufficientData` for fewer than three prices (two returns), and
/// `InvalidParameters` for a non-positive price or annualization factor.
pub fn estimate_volatility(prices: &[f64], annualization_factor: f64) -> PricingResultT<f64> {
    validate_positive("annualization_factor", annualization_factor)?;
    if prices.len() < 3 {
        return Err(PricingError::InsufficientData {
            needed: 3,
            got: prices.len(),
        });
    }
    for &p in prices {
        validate_positive("price", p)?;
    }

    let returns = log_returns(prices);
    let daily_vol = returns.iter().std_dev();
    Ok(daily_vol * annualization_factor.sqrt())
}

/// Latest price and annualized daily volatility of a series
pub fn spot_and_volatility(prices: &[f64]) -> PricingResultT<(f64, f64)> {
    let volatility = estimate_volatility(prices, DAILY_ANNUALIZATION)?;
    let spot = *prices.last().ok_or(PricingError::InsufficientData {
        needed: 3,
        got: 0,
    })?;
    Ok((spot, volatility))
}

/// Read one numeric column (e.g. `Close`) from a CSV with a header row
pub fn read_price_column(path: impl AsRef<Path>, column: &str) -> PricingResultT<Vec<f64>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let index = reader
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| {
            PricingError::invalid_config("column", format!("no '{}' column in price history", column))
        })?;

    let mut prices = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = record.get(index).unwrap_or("").trim();
        // skip gaps such as holidays exported as empty cells
        if field.is_empty() {
            continue;
        }
        let price = field.parse::<f64>().map_err(|e| {
            PricingError::invalid_config(column, format!("bad price '{}': {}", field, e))
        })?;
        prices.push(price);
    }

    debug!(path = %path.as_ref().display(), rows = prices.len(), "loaded price history");
    Ok(prices)
}
