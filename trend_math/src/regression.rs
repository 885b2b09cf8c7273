//! Weighted least-squares trend lines
//!
//! Fits `y = intercept + slope * x` minimising `sum(w_i * (y_i - y_hat_i)^2)`.
//! With uniform weights this is ordinary least squares.

use crate::{ensure_finite, MathError, Result};

/// A fitted weighted linear regression line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedLinearRegression {
    slope: f64,
    intercept: f64,
    n_points: usize,
}

impl WeightedLinearRegression {
    /// Fit a line through `(x, y)` pairs using per-sample `weights`.
    ///
    /// When every `x` is identical the slope is zero and the intercept is
    /// the weighted mean of `y`.
    pub fn fit(x: &[f64], y: &[f64], weights: &[f64]) -> Result<Self> {
        if x.is_empty() {
            return Err(MathError::InsufficientData(
                "Need at least one point for a regression".to_string(),
            ));
        }
        if x.len() != y.len() || x.len() != weights.len() {
            return Err(MathError::InvalidInput(format!(
                "Length mismatch: x={}, y={}, weights={}",
                x.len(),
                y.len(),
                weights.len()
            )));
        }
        ensure_finite(x, "x")?;
        ensure_finite(y, "y")?;
        ensure_finite(weights, "weights")?;
        if weights.iter().any(|&w| w < 0.0) {
            return Err(MathError::InvalidInput(
                "Regression weights must be non-negative".to_string(),
            ));
        }

        let weight_sum: f64 = weights.iter().sum();
        if weight_sum <= 0.0 {
            return Err(MathError::InvalidInput(
                "Regression weights must not all be zero".to_string(),
            ));
        }

        let x_mean = weighted_mean(x, weights, weight_sum);
        let y_mean = weighted_mean(y, weights, weight_sum);

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for ((&xi, &yi), &wi) in x.iter().zip(y).zip(weights) {
            numerator += wi * (xi - x_mean) * (yi - y_mean);
            denominator += wi * (xi - x_mean) * (xi - x_mean);
        }

        let slope = if denominator.abs() < f64::EPSILON {
            0.0
        } else {
            numerator / denominator
        };
        let intercept = y_mean - slope * x_mean;

        if !slope.is_finite() || !intercept.is_finite() {
            return Err(MathError::CalculationError(
                "Regression produced non-finite coefficients".to_string(),
            ));
        }

        Ok(Self {
            slope,
            intercept,
            n_points: x.len(),
        })
    }

    /// Fit against 0-based positions `0, 1, ..., y.len() - 1`.
    pub fn fit_positions(y: &[f64], weights: &[f64]) -> Result<Self> {
        let x: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
        Self::fit(&x, y, weights)
    }

    /// Evaluate the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Evaluate the line at positions `start, start + 1, ..., start + count - 1`.
    pub fn extrapolate(&self, start: usize, count: usize) -> Vec<f64> {
        (start..start + count)
            .map(|position| self.predict(position as f64))
            .collect()
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of points the line was fitted on
    pub fn n_points(&self) -> usize {
        self.n_points
    }
}

fn weighted_mean(values: &[f64], weights: &[f64], weight_sum: f64) -> f64 {
    values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / weight_sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moving_averages::linear_weights;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_line() {
        let y = [10.0, 20.0, 30.0, 40.0];
        let lr = WeightedLinearRegression::fit_positions(&y, &linear_weights(4)).unwrap();

        assert_relative_eq!(lr.slope(), 10.0, epsilon = 1e-9);
        assert_relative_eq!(lr.intercept(), 10.0, epsilon = 1e-9);
        let next = lr.extrapolate(4, 2);
        assert_relative_eq!(next[0], 50.0, epsilon = 1e-9);
        assert_relative_eq!(next[1], 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_weights_pull_toward_recent_points() {
        // Flat history followed by a jump at the end
        let y = [0.0, 0.0, 0.0, 0.0, 10.0];
        let uniform = WeightedLinearRegression::fit_positions(&y, &[1.0; 5]).unwrap();
        let recency = WeightedLinearRegression::fit_positions(&y, &linear_weights(5)).unwrap();

        assert_relative_eq!(uniform.slope(), 2.0, epsilon = 1e-9);
        assert!(recency.predict(4.0) > uniform.predict(4.0));
    }

    #[test]
    fn test_single_point_is_flat() {
        let lr = WeightedLinearRegression::fit_positions(&[7.5], &[1.0]).unwrap();

        assert_eq!(lr.slope(), 0.0);
        assert_eq!(lr.intercept(), 7.5);
        assert_eq!(lr.extrapolate(1, 3), vec![7.5, 7.5, 7.5]);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            WeightedLinearRegression::fit(&[], &[], &[]),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            WeightedLinearRegression::fit(&[0.0, 1.0], &[1.0], &[1.0, 1.0]),
            Err(MathError::InvalidInput(_))
        ));
        assert!(matches!(
            WeightedLinearRegression::fit(&[0.0, 1.0], &[1.0, 2.0], &[0.0, 0.0]),
            Err(MathError::InvalidInput(_))
        ));
        assert!(WeightedLinearRegression::fit_positions(&[1.0, f64::INFINITY], &[1.0, 1.0]).is_err());
    }
}
