use approx::assert_relative_eq;
use channel_forecast::models::boosted_tree::{BoostedConfig, BoostedTreeModel, FeatureMode};
use channel_forecast::models::moving_average::{moving_average_forecast, MovingAverageModel};
use channel_forecast::models::weighted_trend::{weighted_trend_forecast, WeightedTrendModel};
use channel_forecast::models::{ForecastModel, ForecastResult, Method};
use channel_forecast::ForecastError;
use rstest::rstest;

/// Upward drift with a repeating wobble
fn noisy_series(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 500.0 + 20.0 * i as f64 + ((i * 7919) % 13) as f64 * 3.0)
        .collect()
}

fn linear_series(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

#[test]
fn test_moving_average_is_flat_at_trailing_mean() {
    let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();

    let forecast = moving_average_forecast(&values, 7, 5).unwrap();

    // mean of 4..=10
    assert_eq!(forecast, vec![7.0; 5]);
}

#[test]
fn test_moving_average_model() {
    let model = MovingAverageModel::new(3).unwrap();
    let values = [100.0, 102.0, 104.0, 103.0, 105.0];

    let forecast = model.forecast(&values, 2).unwrap();

    assert_eq!(model.method(), Method::MovingAverage);
    assert_eq!(forecast.horizons(), 2);
    for value in forecast.values() {
        assert_relative_eq!(*value, 104.0, epsilon = 1e-9);
    }
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(6)]
fn test_moving_average_short_series_is_empty(#[case] n: usize) {
    let values = noisy_series(n);

    assert!(moving_average_forecast(&values, 7, 30).unwrap().is_empty());

    let result = MovingAverageModel::default().forecast(&values, 30).unwrap();
    assert!(result.is_empty());
    assert_eq!(result.horizons(), 30);
}

#[rstest]
#[case(0)]
#[case(5)]
#[case(29)]
fn test_weighted_trend_short_series_is_empty(#[case] n: usize) {
    let values = noisy_series(n);

    assert!(weighted_trend_forecast(&values, 30, 30).unwrap().is_empty());
    assert!(WeightedTrendModel::default()
        .forecast(&values, 30)
        .unwrap()
        .is_empty());
}

#[test]
fn test_weighted_trend_continues_linear_growth() {
    let values = linear_series(40, 1000.0, 100.0);

    let forecast = weighted_trend_forecast(&values, 30, 5).unwrap();

    let expected = [5000.0, 5100.0, 5200.0, 5300.0, 5400.0];
    assert_eq!(forecast.len(), expected.len());
    for (got, want) in forecast.iter().zip(expected) {
        assert_relative_eq!(*got, want, epsilon = 1e-6);
    }
}

#[test]
fn test_weighted_trend_follows_direction_of_window() {
    // Concave growth and its mirror image
    let rising: Vec<f64> = (0..30).map(|i| 100.0 * ((i + 1) as f64).sqrt()).collect();
    let falling: Vec<f64> = rising.iter().map(|v| 1000.0 - v).collect();

    let up = weighted_trend_forecast(&rising, 30, 30).unwrap();
    let down = weighted_trend_forecast(&falling, 30, 30).unwrap();

    let last_up = *rising.last().unwrap();
    let last_down = *falling.last().unwrap();
    assert!(up.iter().all(|&v| v >= last_up));
    assert!(down.iter().all(|&v| v <= last_down));
    assert!(up.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_weighted_trend_may_extrapolate_below_zero() {
    let values = linear_series(30, 2900.0, -100.0);

    let forecast = weighted_trend_forecast(&values, 30, 3).unwrap();

    // Clamping happens at assembly, not here
    assert_relative_eq!(forecast[0], -100.0, epsilon = 1e-6);
    assert_relative_eq!(forecast[2], -300.0, epsilon = 1e-6);
}

#[rstest]
#[case(1)]
#[case(5)]
#[case(12)]
#[case(29)]
fn test_boosted_short_history_matches_weighted_trend(#[case] n: usize) {
    let values = noisy_series(n);
    let horizon = 30;

    let boosted = BoostedTreeModel::default().forecast(&values, horizon).unwrap();
    let trend = WeightedTrendModel::new(n).unwrap().forecast(&values, horizon).unwrap();

    assert!(boosted.fell_back());
    assert_eq!(boosted.values(), trend.values());
    assert_eq!(boosted.values().len(), horizon);
}

#[test]
fn test_boosted_too_few_lag_complete_records_falls_back() {
    // 35 days leave only 5 records with a 30-day lag
    let values = noisy_series(35);

    let boosted = BoostedTreeModel::default().forecast(&values, 10).unwrap();
    let trend = weighted_trend_forecast(&values, 35, 10).unwrap();

    assert!(boosted.fell_back());
    assert_eq!(boosted.values(), trend.as_slice());
}

#[test]
fn test_boosted_with_enough_history_fits_trees() {
    let values = linear_series(40, 1000.0, 100.0);

    let result = BoostedTreeModel::default().forecast(&values, 5).unwrap();

    assert!(!result.fell_back());
    assert_eq!(result.values().len(), 5);

    // Day-index trees place every future day in the last leaf
    let first = result.values()[0];
    assert!(result.values().iter().all(|&v| v == first));
    assert!(first > 3000.0 && first <= 4900.0);
}

#[test]
fn test_boosted_lagged_mode_forecasts_recursively() {
    let config = BoostedConfig {
        feature_mode: FeatureMode::Lagged,
        ..BoostedConfig::default()
    };
    let model = BoostedTreeModel::new(config).unwrap();
    let values = noisy_series(60);

    let result = model.forecast(&values, 30).unwrap();

    assert!(!result.fell_back());
    assert_eq!(result.values().len(), 30);
    assert!(result.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_boosted_lagged_mode_repeats_weekly_pattern() {
    // Flat weekdays with a weekend bump
    let values: Vec<f64> = (0..90)
        .map(|i| if i % 7 >= 5 { 1500.0 } else { 1000.0 })
        .collect();

    let lagged = BoostedTreeModel::new(BoostedConfig {
        feature_mode: FeatureMode::Lagged,
        ..BoostedConfig::default()
    })
    .unwrap()
    .forecast(&values, 8)
    .unwrap();
    let day_index = BoostedTreeModel::default().forecast(&values, 8).unwrap();

    // Days 90..98 fall on positions 90 % 7 = 6, then 0..=6
    let weekend = [true, false, false, false, false, false, true, true];
    for (value, is_weekend) in lagged.values().iter().zip(weekend) {
        if is_weekend {
            assert!(*value > 1400.0, "expected weekend level, got {}", value);
        } else {
            assert!(*value < 1100.0, "expected weekday level, got {}", value);
        }
    }

    // Day-index trees cannot see the cycle
    let flat = day_index.values()[0];
    assert!(day_index.values().iter().all(|&v| v == flat));
}

#[test]
fn test_boosted_empty_series() {
    let result = BoostedTreeModel::default().forecast(&[], 30).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_non_finite_values_are_errors() {
    let mut values = noisy_series(40);
    values[39] = f64::NAN;

    assert!(moving_average_forecast(&values, 7, 5).is_err());
    assert!(weighted_trend_forecast(&values, 30, 5).is_err());
    assert!(BoostedTreeModel::default().forecast(&values, 5).is_err());
}

#[test]
fn test_forecast_result_validation() {
    let result = ForecastResult::new(vec![1.0, 2.0], 2).unwrap();
    assert_eq!(result.values(), &[1.0, 2.0]);
    assert!(!result.fell_back());
    assert_eq!(result.into_values(), vec![1.0, 2.0]);

    assert!(matches!(
        ForecastResult::new(vec![1.0], 2),
        Err(ForecastError::ValidationError(_))
    ));
    assert!(matches!(
        ForecastResult::new(vec![f64::INFINITY], 1),
        Err(ForecastError::ForecastingError(_))
    ));
}

#[test]
fn test_model_parameter_validation() {
    assert!(matches!(
        MovingAverageModel::new(0),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(WeightedTrendModel::new(0).is_err());
    assert!(moving_average_forecast(&[1.0], 0, 5).is_err());

    let bad_lags = BoostedConfig {
        lags: vec![0, 7],
        ..BoostedConfig::default()
    };
    assert!(BoostedTreeModel::new(bad_lags).is_err());
}
