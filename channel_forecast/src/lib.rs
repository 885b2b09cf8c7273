//! # Channel Forecast
//!
//! Short-horizon forecasting of a channel's daily views, subscriber gain and
//! revenue, producing a single JSON snapshot for a dashboard.
//!
//! ## Features
//!
//! - Daily metric loading from CSV (via polars), missing values read as zero
//! - Three forecasting methods:
//!   - `ma`: flat line at the mean of the last 7 days
//!   - `wma`: recency-weighted linear trend over the last 30 days
//!   - `xgboost`: gradient-boosted regression trees, falling back to the
//!     weighted trend when history is short
//! - Per-metric post-processing: counts are whole numbers, revenue has two
//!   decimals, nothing is negative
//! - JSON and long-format CSV output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use channel_forecast::{DataLoader, ForecastAssembler, ForecastConfig};
//!
//! # fn main() -> channel_forecast::Result<()> {
//! let config = ForecastConfig::default();
//! let data = DataLoader::from_csv("data/channel_daily_stats.csv")?;
//!
//! let assembler = ForecastAssembler::new(&config)?;
//! if let Some(bundle) = assembler.assemble(&data) {
//!     bundle.write_json(&config.output_path)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::assembler::{generate_predictions, ForecastAssembler, MetricForecast, PredictionBundle};
pub use crate::config::ForecastConfig;
pub use crate::data::{DailyMetrics, DailyRecord, DataLoader, Metric, MetricSeries};
pub use crate::error::{ForecastError, Result};
pub use crate::models::boosted_tree::{BoostedConfig, BoostedTreeModel, FeatureMode};
pub use crate::models::moving_average::{moving_average_forecast, MovingAverageModel};
pub use crate::models::weighted_trend::{weighted_trend_forecast, WeightedTrendModel};
pub use crate::models::{ForecastModel, ForecastResult, Method};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
