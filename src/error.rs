// src/error.rs
use thiserror::Error;

/// Error types for the pricing library
#[derive(Debug, Error)]
pub enum PricingError {
    /// A numeric option parameter violates its constraint
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Simulation settings or textual inputs that cannot be used
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Not enough observations to compute a statistic
    #[error("Insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PricingError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for every variant raised by input validation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            PricingError::InvalidParameters { .. } | PricingError::InvalidConfiguration { .. }
        )
    }
}

/// Result type alias for pricing operations
pub type PricingResultT<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResultT};

    /// Validate that a parameter is finite and strictly positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResultT<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is finite and non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResultT<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResultT<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a simulation count (paths, steps, chunk size); any count of at least 1 is accepted
    pub fn validate_count(field: &str, count: usize) -> PricingResultT<()> {
        if count == 0 {
            Err(PricingError::invalid_config(field, "must be at least 1"))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("spot_price", 100.0).is_ok());
        assert!(validate_positive("spot_price", 0.0).is_err());
        assert!(validate_positive("spot_price", -1.0).is_err());
        assert!(validate_positive("spot_price", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("volatility", 0.0).is_ok());
        assert!(validate_non_negative("volatility", 0.2).is_ok());
        assert!(validate_non_negative("volatility", -0.01).is_err());
        assert!(validate_non_negative("volatility", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count("num_simulations", 1).is_ok());
        assert!(validate_count("num_simulations", 0).is_err());
        assert!(validate_count("num_simulations", 2_000_000_000).is_ok());
        assert!(validate_count("num_simulations", usize::MAX).is_ok());
    }

    #[test]
    fn test_error_display_names_parameter() {
        let error = validate_positive("strike_price", -5.0).unwrap_err();
        let display = format!("{}", error);
        assert!(display.contains("strike_price"));
        assert!(display.contains("-5"));
        assert!(display.contains("positive"));
        assert!(error.is_invalid_input());
    }

    #[test]
    fn test_invalid_configuration_display() {
        let error = validate_count("num_simulations", 0).unwrap_err();
        assert!(matches!(error, PricingError::InvalidConfiguration { .. }));
        assert_eq!(
            error.to_string(),
            "Invalid configuration for 'num_simulations': must be at least 1"
        );
    }
}
