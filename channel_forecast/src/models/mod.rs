//! Forecasting models for daily metric series

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// The forecasting method families, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Flat line at the trailing mean
    #[serde(rename = "ma")]
    MovingAverage,
    /// Recency-weighted linear trend
    #[serde(rename = "wma")]
    WeightedTrend,
    /// Gradient-boosted regression trees
    #[serde(rename = "xgboost")]
    BoostedTree,
}

impl Method {
    pub const ALL: [Method; 3] = [
        Method::MovingAverage,
        Method::WeightedTrend,
        Method::BoostedTree,
    ];

    /// Key used in output documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::MovingAverage => "ma",
            Method::WeightedTrend => "wma",
            Method::BoostedTree => "xgboost",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forecast result containing predicted values
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values, empty when the series was too short
    values: Vec<f64>,
    /// Number of periods requested
    horizons: usize,
    /// Whether the model delegated to a simpler one
    fell_back: bool,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::ForecastingError(format!(
                "Forecast step {} is not a finite number",
                idx
            )));
        }

        Ok(Self {
            values,
            horizons,
            fell_back: false,
        })
    }

    /// A result with no values, for series shorter than the model's window
    pub fn insufficient(horizons: usize) -> Self {
        Self {
            values: Vec::new(),
            horizons,
            fell_back: false,
        }
    }

    /// Mark the result as produced by a fallback model
    pub fn into_fallback(mut self) -> Self {
        self.fell_back = true;
        self
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Get the number of periods requested
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn fell_back(&self) -> bool {
        self.fell_back
    }
}

/// A forecaster that is a pure function of a series and its own parameters
pub trait ForecastModel: Debug {
    /// Method family this model reports under
    fn method(&self) -> Method;

    /// Human-readable name including parameters
    fn name(&self) -> &str;

    /// Forecast `horizon` steps past the end of `values`.
    ///
    /// A series too short for the model yields an empty result, not an error.
    fn forecast(&self, values: &[f64], horizon: usize) -> Result<ForecastResult>;
}

pub mod boosted_tree;
pub mod moving_average;
pub mod weighted_trend;
