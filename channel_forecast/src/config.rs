//! Run configuration
//!
//! Everything a forecasting run needs is carried in [`ForecastConfig`] and
//! handed to the loader, assembler and writers explicitly. Values come from
//! defaults, optionally overlaid by a JSON file, then by command-line flags.

use crate::error::{ForecastError, Result};
use crate::models::boosted_tree::BoostedConfig;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default number of days to forecast
pub const DEFAULT_HORIZON: usize = 30;

/// Configuration for a forecasting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// CSV file with one row per day
    pub input_path: PathBuf,
    /// JSON document consumed by the dashboard
    pub output_path: PathBuf,
    /// Optional long-format CSV export
    pub csv_output_path: Option<PathBuf>,
    /// Number of future days
    pub horizon: usize,
    /// Trailing window of the moving average
    pub ma_window: usize,
    /// Trailing window of the weighted trend
    pub wma_window: usize,
    pub boosted: BoostedConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/channel_daily_stats.csv"),
            output_path: PathBuf::from("dashboard/public/prediction_data.json"),
            csv_output_path: None,
            horizon: DEFAULT_HORIZON,
            ma_window: crate::models::moving_average::DEFAULT_WINDOW,
            wma_window: crate::models::weighted_trend::DEFAULT_WINDOW,
            boosted: BoostedConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Load a configuration from a JSON file; missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Horizon must be positive".to_string(),
            ));
        }
        if self.ma_window == 0 || self.wma_window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window sizes must be positive".to_string(),
            ));
        }
        self.boosted.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::boosted_tree::FeatureMode;

    #[test]
    fn test_defaults() {
        let config = ForecastConfig::default();

        assert_eq!(config.horizon, 30);
        assert_eq!(config.ma_window, 7);
        assert_eq!(config.wma_window, 30);
        assert_eq!(config.boosted.lags, vec![1, 7, 30]);
        assert_eq!(config.boosted.feature_mode, FeatureMode::DayIndex);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "horizon": 14, "boosted": { "feature_mode": "lagged" } }"#;
        let config: ForecastConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.horizon, 14);
        assert_eq!(config.ma_window, 7);
        assert_eq!(config.boosted.feature_mode, FeatureMode::Lagged);
        assert_eq!(config.boosted.min_history, 30);
        assert_eq!(config.boosted.params.n_estimators, 100);
    }

    #[test]
    fn test_validation() {
        let zero_horizon = ForecastConfig {
            horizon: 0,
            ..ForecastConfig::default()
        };
        assert!(matches!(
            zero_horizon.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));

        let mut bad_rate = ForecastConfig::default();
        bad_rate.boosted.params.learning_rate = 2.0;
        assert!(bad_rate.validate().is_err());
    }
}
