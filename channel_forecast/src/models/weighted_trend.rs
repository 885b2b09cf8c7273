//! Recency-weighted linear trend model
//!
//! Fits a line through the trailing window against positions `0..W`, with
//! weights `1..=W` so the newest day counts most, and extends it past the
//! window. This is the only model that carries a slope forward.

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, Method};
use trend_math::moving_averages::{linear_weights, trailing_window};
use trend_math::regression::WeightedLinearRegression;

/// Default trailing window in days
pub const DEFAULT_WINDOW: usize = 30;

/// Extrapolate a recency-weighted least-squares line over the last `window`
/// values to positions `window..window + horizon`.
///
/// Returns an empty vector when `values` is shorter than `window`.
pub fn weighted_trend_forecast(values: &[f64], window: usize, horizon: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "Window size must be positive".to_string(),
        ));
    }
    if values.len() < window {
        return Ok(Vec::new());
    }

    let recent = trailing_window(values, window)?;
    let line = WeightedLinearRegression::fit_positions(recent, &linear_weights(window))?;

    Ok(line.extrapolate(window, horizon))
}

/// Weighted trend model
#[derive(Debug, Clone)]
pub struct WeightedTrendModel {
    /// Name of the model
    name: String,
    /// Window size
    window: usize,
}

impl WeightedTrendModel {
    /// Create a new weighted trend model
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Weighted Linear Trend (window={})", window),
            window,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for WeightedTrendModel {
    fn default() -> Self {
        Self {
            name: format!("Weighted Linear Trend (window={})", DEFAULT_WINDOW),
            window: DEFAULT_WINDOW,
        }
    }
}

impl ForecastModel for WeightedTrendModel {
    fn method(&self) -> Method {
        Method::WeightedTrend
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn forecast(&self, values: &[f64], horizon: usize) -> Result<ForecastResult> {
        let forecast = weighted_trend_forecast(values, self.window, horizon)?;
        if forecast.is_empty() {
            return Ok(ForecastResult::insufficient(horizon));
        }

        ForecastResult::new(forecast, horizon)
    }
}
