//! # Trend Math
//!
//! Numeric building blocks for short-horizon forecasting of daily metrics.
//! Nothing in this crate performs I/O; every function is a pure function of
//! its inputs.

use thiserror::Error;

pub mod boosting;
pub mod features;
pub mod moving_averages;
pub mod regression;

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for trend math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Reject NaN and infinite values before they reach a fit.
pub(crate) fn ensure_finite(values: &[f64], what: &str) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(MathError::InvalidInput(format!(
            "{} contains a non-finite value at position {}",
            what, idx
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(&[1.0, 2.0], "values").is_ok());

        let err = ensure_finite(&[1.0, f64::NAN], "values").unwrap_err();
        assert!(matches!(err, MathError::InvalidInput(_)));
        assert!(err.to_string().contains("position 1"));
    }
}
