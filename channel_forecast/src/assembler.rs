//! Runs every model on every metric and merges the results
//!
//! Each (method, metric) pair is forecast independently. A pair whose
//! series is too short yields an empty array; a pair whose model fails is
//! logged and left out, without affecting the others.

use crate::config::ForecastConfig;
use crate::data::{DailyMetrics, DataLoader, Metric, Rounding};
use crate::error::Result;
use crate::models::boosted_tree::BoostedTreeModel;
use crate::models::moving_average::MovingAverageModel;
use crate::models::weighted_trend::WeightedTrendModel;
use crate::models::{ForecastModel, Method};
use crate::utils::{clamp_non_negative, future_dates, round_value};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Post-processed forecast values of one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricForecast {
    /// Whole-number metrics
    Counts(Vec<u64>),
    /// Monetary metrics, two decimals
    Amounts(Vec<f64>),
}

impl MetricForecast {
    /// Clamp at zero and round every value for `metric`.
    pub fn from_raw(metric: Metric, raw: &[f64]) -> Self {
        let rounding = metric.rounding();
        let processed = raw
            .iter()
            .map(|&value| round_value(clamp_non_negative(value), rounding));

        match rounding {
            Rounding::Integer => MetricForecast::Counts(processed.map(|v| v as u64).collect()),
            Rounding::Cents => MetricForecast::Amounts(processed.collect()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            MetricForecast::Counts(values) => values.len(),
            MetricForecast::Amounts(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values as floating point, whatever the rounding
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            MetricForecast::Counts(values) => values.iter().map(|&v| v as f64).collect(),
            MetricForecast::Amounts(values) => values.clone(),
        }
    }
}

/// One forecasting snapshot, as written for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionBundle {
    /// Generation time
    pub last_updated: DateTime<Utc>,
    /// Future calendar days shared by every forecast
    pub dates: Vec<NaiveDate>,
    pub predictions: BTreeMap<Method, BTreeMap<Metric, MetricForecast>>,
}

impl PredictionBundle {
    /// Forecast of one (method, metric) pair, if it was produced
    pub fn get(&self, method: Method, metric: Metric) -> Option<&MetricForecast> {
        self.predictions.get(&method)?.get(&metric)
    }
}

/// Orchestrates the three models over the three metrics
#[derive(Debug, Clone)]
pub struct ForecastAssembler {
    horizon: usize,
    moving_average: MovingAverageModel,
    weighted_trend: WeightedTrendModel,
    boosted_tree: BoostedTreeModel,
}

impl ForecastAssembler {
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            horizon: config.horizon,
            moving_average: MovingAverageModel::new(config.ma_window)?,
            weighted_trend: WeightedTrendModel::new(config.wma_window)?,
            boosted_tree: BoostedTreeModel::new(config.boosted.clone())?,
        })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    fn models(&self) -> [&dyn ForecastModel; 3] {
        [
            &self.moving_average,
            &self.weighted_trend,
            &self.boosted_tree,
        ]
    }

    /// Build a bundle stamped with the current time.
    ///
    /// Returns `None` when there is no history at all.
    pub fn assemble(&self, data: &DailyMetrics) -> Option<PredictionBundle> {
        self.assemble_at(data, Utc::now())
    }

    /// Build a bundle stamped with `generated_at`.
    pub fn assemble_at(
        &self,
        data: &DailyMetrics,
        generated_at: DateTime<Utc>,
    ) -> Option<PredictionBundle> {
        let Some(last_date) = data.last_date() else {
            warn!("no historical data, skipping forecast generation");
            return None;
        };

        info!(
            days = data.len(),
            %last_date,
            horizon = self.horizon,
            "generating forecasts"
        );

        let mut predictions: BTreeMap<Method, BTreeMap<Metric, MetricForecast>> = Method::ALL
            .iter()
            .map(|&method| (method, BTreeMap::new()))
            .collect();

        for metric in Metric::ALL {
            let values = data.values(metric);
            for model in self.models() {
                let method = model.method();
                match model.forecast(values, self.horizon) {
                    Ok(result) => {
                        if result.is_empty() {
                            debug!(%method, %metric, n = values.len(), "insufficient history");
                        } else if result.fell_back() {
                            debug!(%method, %metric, n = values.len(), "fell back to weighted trend");
                        }
                        predictions
                            .entry(method)
                            .or_default()
                            .insert(metric, MetricForecast::from_raw(metric, result.values()));
                    }
                    Err(e) => {
                        warn!(%method, %metric, model = model.name(), error = %e, "forecast failed");
                    }
                }
            }
        }

        Some(PredictionBundle {
            last_updated: generated_at,
            dates: future_dates(last_date, self.horizon),
            predictions,
        })
    }
}

/// Load the configured input, forecast it and write the configured outputs.
///
/// Returns `None`, writing nothing, when the input holds no rows.
pub fn generate_predictions(config: &ForecastConfig) -> Result<Option<PredictionBundle>> {
    let assembler = ForecastAssembler::new(config)?;
    let data = DataLoader::from_csv(&config.input_path)?;

    let Some(bundle) = assembler.assemble(&data) else {
        return Ok(None);
    };

    bundle.write_json(&config.output_path)?;
    info!(path = %config.output_path.display(), "predictions saved");

    if let Some(csv_path) = &config.csv_output_path {
        bundle.write_csv(csv_path)?;
        info!(path = %csv_path.display(), "prediction csv saved");
    }

    Ok(Some(bundle))
}
