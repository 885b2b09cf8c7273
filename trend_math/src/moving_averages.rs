//! Trailing-window averages
//!
//! Contains:
//! - Trailing Simple Moving Average (the flat-line baseline level)
//! - Linear recency weights (1..=W, oldest lightest)

use crate::{ensure_finite, MathError, Result};
use statrs::statistics::Statistics;

/// Borrow the last `window` values of a series.
pub fn trailing_window(values: &[f64], window: usize) -> Result<&[f64]> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window must be greater than zero".to_string(),
        ));
    }
    if values.len() < window {
        return Err(MathError::InsufficientData(format!(
            "Need {} values for the trailing window, have {}.",
            window,
            values.len()
        )));
    }

    Ok(&values[values.len() - window..])
}

/// Mean of the last `window` values.
pub fn trailing_mean(values: &[f64], window: usize) -> Result<f64> {
    let recent = trailing_window(values, window)?;
    ensure_finite(recent, "trailing window")?;

    Ok(recent.mean())
}

/// Linearly increasing weights `1, 2, ..., window`.
pub fn linear_weights(window: usize) -> Vec<f64> {
    (1..=window).map(|w| w as f64).collect()
}
