//! # Channel Forecast Workspace
//!
//! Umbrella crate re-exporting the workspace members:
//!
//! - [`forecast`]: loading daily channel metrics, running the forecasters
//!   and writing the dashboard snapshot
//! - [`math`]: the numeric building blocks (trailing averages, weighted
//!   regression, lag features, boosted trees)
//!
//! ## Example
//!
//! ```
//! use channel_forecast_workspace::forecast::{DailyMetrics, DailyRecord, ForecastAssembler, ForecastConfig};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let data = DailyMetrics::from_records((0..10u64).map(|i| {
//!     DailyRecord::new(start + chrono::Days::new(i), 100.0, 5.0, 1.5)
//! }));
//!
//! let assembler = ForecastAssembler::new(&ForecastConfig::default()).unwrap();
//! let bundle = assembler.assemble(&data).unwrap();
//! assert_eq!(bundle.dates.len(), 30);
//! ```

pub use channel_forecast as forecast;
pub use trend_math as math;
