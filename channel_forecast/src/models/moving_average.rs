//! Moving average model for flat-line forecasting

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, Method};
use trend_math::moving_averages::trailing_mean;

/// Default trailing window in days
pub const DEFAULT_WINDOW: usize = 7;

/// Forecast `horizon` copies of the mean of the last `window` values.
///
/// Returns an empty vector when `values` is shorter than `window`.
pub fn moving_average_forecast(values: &[f64], window: usize, horizon: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(ForecastError::InvalidParameter(
            "Window size must be positive".to_string(),
        ));
    }
    if values.len() < window {
        return Ok(Vec::new());
    }

    let level = trailing_mean(values, window)?;
    Ok(vec![level; horizon])
}

/// Simple Moving Average model
#[derive(Debug, Clone)]
pub struct MovingAverageModel {
    /// Name of the model
    name: String,
    /// Window size
    window: usize,
}

impl MovingAverageModel {
    /// Create a new Simple Moving Average model
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Simple Moving Average (window={})", window),
            window,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for MovingAverageModel {
    fn default() -> Self {
        Self {
            name: format!("Simple Moving Average (window={})", DEFAULT_WINDOW),
            window: DEFAULT_WINDOW,
        }
    }
}

impl ForecastModel for MovingAverageModel {
    fn method(&self) -> Method {
        Method::MovingAverage
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn forecast(&self, values: &[f64], horizon: usize) -> Result<ForecastResult> {
        let forecast = moving_average_forecast(values, self.window, horizon)?;
        if forecast.is_empty() {
            return Ok(ForecastResult::insufficient(horizon));
        }

        ForecastResult::new(forecast, horizon)
    }
}
