//! # channel-forecast
//!
//! Batch entry point: read the daily metrics table, forecast every metric
//! with every method and write the dashboard snapshot.

use channel_forecast::{generate_predictions, FeatureMode, ForecastConfig, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "channel-forecast")]
#[command(version, about = "Forecast daily channel metrics for the dashboard", long_about = None)]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(short, long, env = "CHANNEL_FORECAST_CONFIG")]
    config: Option<PathBuf>,

    /// Daily metrics CSV (date, view_count, subscriber_count, revenue)
    #[arg(short, long, env = "CHANNEL_FORECAST_INPUT")]
    input: Option<PathBuf>,

    /// Output JSON document
    #[arg(short, long, env = "CHANNEL_FORECAST_OUTPUT")]
    output: Option<PathBuf>,

    /// Also write a long-format CSV (date, method, metric, value)
    #[arg(long, env = "CHANNEL_FORECAST_CSV_OUTPUT")]
    csv_output: Option<PathBuf>,

    /// Number of days to forecast
    #[arg(long, env = "CHANNEL_FORECAST_HORIZON")]
    horizon: Option<usize>,

    /// Trailing window of the moving average
    #[arg(long, env = "CHANNEL_FORECAST_MA_WINDOW")]
    ma_window: Option<usize>,

    /// Trailing window of the weighted trend
    #[arg(long, env = "CHANNEL_FORECAST_WMA_WINDOW")]
    wma_window: Option<usize>,

    /// Features used by the boosted trees
    #[arg(long, value_enum, env = "CHANNEL_FORECAST_FEATURE_MODE")]
    feature_mode: Option<FeatureMode>,
}

impl Cli {
    fn into_config(self) -> Result<ForecastConfig> {
        let mut config = match &self.config {
            Some(path) => ForecastConfig::from_json_file(path)?,
            None => ForecastConfig::default(),
        };

        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.csv_output.is_some() {
            config.csv_output_path = self.csv_output;
        }
        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if let Some(window) = self.ma_window {
            config.ma_window = window;
        }
        if let Some(window) = self.wma_window {
            config.wma_window = window;
        }
        if let Some(mode) = self.feature_mode {
            config.boosted.feature_mode = mode;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    tracing::info!(input = %config.input_path.display(), "starting prediction engine");

    match generate_predictions(&config)? {
        Some(bundle) => tracing::info!(days = bundle.dates.len(), "forecast complete"),
        None => tracing::warn!(input = %config.input_path.display(), "no data found, nothing written"),
    }

    Ok(())
}

fn main() -> ExitCode {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "channel_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "prediction run failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("channel-forecast").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = parse(&[]).into_config().unwrap();
        assert_eq!(config, ForecastConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forecast.json");
        fs::write(&path, r#"{ "horizon": 7, "ma_window": 3, "output_path": "from_file.json" }"#)
            .unwrap();

        let config = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--horizon",
            "12",
            "--csv-output",
            "out/predictions.csv",
            "--feature-mode",
            "lagged",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.horizon, 12);
        assert_eq!(config.ma_window, 3);
        assert_eq!(config.wma_window, 30);
        assert_eq!(config.output_path, PathBuf::from("from_file.json"));
        assert_eq!(
            config.csv_output_path,
            Some(PathBuf::from("out/predictions.csv"))
        );
        assert_eq!(config.boosted.feature_mode, FeatureMode::Lagged);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        assert!(parse(&["--wma-window", "0"]).into_config().is_err());
        assert!(Cli::try_parse_from(["channel-forecast", "--feature-mode", "weekly"]).is_err());
    }

    #[test]
    fn test_no_data_run_succeeds_without_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("daily.csv");
        let output = dir.path().join("prediction_data.json");
        fs::write(&input, "").unwrap();

        let cli = parse(&[
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);

        assert!(run(cli).is_ok());
        assert!(!output.exists());
    }
}
