//! Gradient-boosted tree model with weighted-trend fallback
//!
//! Escalation:
//! 1. fewer than `min_history` values: weighted trend over the whole series
//! 2. fewer than `min_training_rows` lag-complete records: same fallback
//! 3. otherwise fit boosted trees on the lag-complete records
//!
//! Lag-complete records are `(day_index, lag_1, lag_7, lag_30)` with the
//! first `max(lags)` positions dropped. In [`FeatureMode::DayIndex`] the
//! trees see only `day_index` and future day indices are predicted
//! directly; in [`FeatureMode::Lagged`] all features are used and each
//! prediction is fed back as history for the next step.

use crate::error::{ForecastError, Result};
use crate::models::weighted_trend::weighted_trend_forecast;
use crate::models::{ForecastModel, ForecastResult, Method};
use serde::{Deserialize, Serialize};
use tracing::debug;
use trend_math::boosting::{BoostingParams, GradientBoostedTrees};
use trend_math::features::{feature_row, lag_records, LagRecords};

/// Which features the boosted trees are trained on
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureMode {
    /// Day index only, direct multi-step prediction
    #[default]
    DayIndex,
    /// Day index plus lags, recursive multi-step prediction
    Lagged,
}

/// Configuration for [`BoostedTreeModel`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostedConfig {
    /// Below this many values the model falls back to the weighted trend
    pub min_history: usize,
    /// Below this many lag-complete records the model falls back too
    pub min_training_rows: usize,
    /// Lag offsets in days
    pub lags: Vec<usize>,
    pub feature_mode: FeatureMode,
    pub params: BoostingParams,
}

impl Default for BoostedConfig {
    fn default() -> Self {
        Self {
            min_history: 30,
            min_training_rows: 10,
            lags: vec![1, 7, 30],
            feature_mode: FeatureMode::default(),
            params: BoostingParams::default(),
        }
    }
}

impl BoostedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_training_rows == 0 {
            return Err(ForecastError::InvalidParameter(
                "min_training_rows must be positive".to_string(),
            ));
        }
        if self.lags.contains(&0) {
            return Err(ForecastError::InvalidParameter(
                "Lag offsets must be at least 1".to_string(),
            ));
        }
        self.params
            .validate()
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))
    }
}

fn describe(config: &BoostedConfig) -> String {
    format!(
        "Boosted Trees ({:?}, rounds={}, lr={})",
        config.feature_mode, config.params.n_estimators, config.params.learning_rate
    )
}

/// Boosted regression tree model
#[derive(Debug, Clone)]
pub struct BoostedTreeModel {
    /// Name of the model
    name: String,
    config: BoostedConfig,
}

impl BoostedTreeModel {
    pub fn new(config: BoostedConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: describe(&config),
            config,
        })
    }

    pub fn config(&self) -> &BoostedConfig {
        &self.config
    }

    fn fallback(&self, values: &[f64], horizon: usize) -> Result<ForecastResult> {
        let forecast = weighted_trend_forecast(values, values.len(), horizon)?;
        Ok(ForecastResult::new(forecast, horizon)?.into_fallback())
    }

    fn forecast_day_index(
        &self,
        records: &LagRecords,
        n: usize,
        horizon: usize,
    ) -> Result<Vec<f64>> {
        let model = GradientBoostedTrees::fit(
            &records.day_index_only(),
            &records.targets,
            self.config.params.clone(),
        )?;

        let future: Vec<Vec<f64>> = (0..horizon).map(|i| vec![(n + i) as f64]).collect();
        Ok(model.predict_many(&future)?)
    }

    fn forecast_lagged(
        &self,
        values: &[f64],
        records: &LagRecords,
        horizon: usize,
    ) -> Result<Vec<f64>> {
        let model = GradientBoostedTrees::fit(
            &records.features,
            &records.targets,
            self.config.params.clone(),
        )?;

        let mut history = values.to_vec();
        let mut forecast = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            let row = feature_row(&history, history.len(), &self.config.lags)?;
            let next = model.predict(&row)?;
            history.push(next);
            forecast.push(next);
        }

        Ok(forecast)
    }
}

impl Default for BoostedTreeModel {
    fn default() -> Self {
        let config = BoostedConfig::default();
        Self {
            name: describe(&config),
            config,
        }
    }
}

impl ForecastModel for BoostedTreeModel {
    fn method(&self) -> Method {
        Method::BoostedTree
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn forecast(&self, values: &[f64], horizon: usize) -> Result<ForecastResult> {
        let n = values.len();
        if n == 0 {
            return Ok(ForecastResult::insufficient(horizon));
        }

        if n < self.config.min_history {
            debug!(n, min_history = self.config.min_history, "short history, using weighted trend");
            return self.fallback(values, horizon);
        }

        let records = lag_records(values, &self.config.lags)?;
        if records.len() < self.config.min_training_rows {
            debug!(
                records = records.len(),
                min_training_rows = self.config.min_training_rows,
                "too few lag-complete records, using weighted trend"
            );
            return self.fallback(values, horizon);
        }

        let forecast = match self.config.feature_mode {
            FeatureMode::DayIndex => self.forecast_day_index(&records, n, horizon)?,
            FeatureMode::Lagged => self.forecast_lagged(values, &records, horizon)?,
        };

        ForecastResult::new(forecast, horizon)
    }
}
