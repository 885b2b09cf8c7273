use channel_forecast::error::ForecastError;
use std::io;
use trend_math::MathError;

#[test]
fn test_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    assert!(matches!(
        ForecastError::from(io_error),
        ForecastError::IoError(_)
    ));

    let math_error = MathError::InsufficientData("need 30 values".to_string());
    assert!(matches!(
        ForecastError::from(math_error),
        ForecastError::MathError(MathError::InsufficientData(_))
    ));

    let json_error = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::SerializationError(_)
    ));
}

#[test]
fn test_error_display() {
    let error = ForecastError::InvalidParameter("Window size must be positive".to_string());
    assert_eq!(error.to_string(), "Invalid parameter: Window size must be positive");

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));

    let nested = ForecastError::from(MathError::CalculationError("overflow".to_string()));
    assert!(nested.to_string().contains("overflow"));
}

#[test]
fn test_model_errors_surface_as_math_errors() {
    use channel_forecast::weighted_trend_forecast;

    let err = weighted_trend_forecast(&[1.0, f64::NAN, 3.0], 3, 2).unwrap_err();

    assert!(matches!(err, ForecastError::MathError(MathError::InvalidInput(_))));
}
