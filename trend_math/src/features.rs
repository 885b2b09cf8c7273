//! Lag feature construction for tree-based regression
//!
//! A record for position `i` carries `[i, x[i - lag_0], x[i - lag_1], ...]`
//! as features and `x[i]` as target. Positions without the full lag history
//! are dropped, so the first `max(lags)` positions never produce a record.

use crate::{MathError, Result};

/// Training records built from a single series
#[derive(Debug, Clone, PartialEq)]
pub struct LagRecords {
    /// Feature rows, `[day_index, lags...]`
    pub features: Vec<Vec<f64>>,
    /// Target value for each row
    pub targets: Vec<f64>,
    /// Position in the source series for each row
    pub day_indices: Vec<usize>,
}

impl LagRecords {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Keep only the day-index column of every row.
    pub fn day_index_only(&self) -> Vec<Vec<f64>> {
        self.features.iter().map(|row| vec![row[0]]).collect()
    }
}

fn validate_lags(lags: &[usize]) -> Result<usize> {
    if lags.contains(&0) {
        return Err(MathError::InvalidInput(
            "Lag offsets must be at least 1".to_string(),
        ));
    }
    Ok(lags.iter().copied().max().unwrap_or(0))
}

/// Build lag-complete records for every position that has `max(lags)`
/// values of history before it.
pub fn lag_records(values: &[f64], lags: &[usize]) -> Result<LagRecords> {
    let max_lag = validate_lags(lags)?;

    let mut records = LagRecords {
        features: Vec::new(),
        targets: Vec::new(),
        day_indices: Vec::new(),
    };

    for day_index in max_lag..values.len() {
        records
            .features
            .push(feature_row(&values[..day_index], day_index, lags)?);
        records.targets.push(values[day_index]);
        records.day_indices.push(day_index);
    }

    Ok(records)
}

/// Feature row for `day_index` given everything observed before it.
///
/// `history` must hold at least `max(lags)` values and end right before
/// `day_index`; only its tail is read.
pub fn feature_row(history: &[f64], day_index: usize, lags: &[usize]) -> Result<Vec<f64>> {
    let max_lag = validate_lags(lags)?;
    if history.len() < max_lag {
        return Err(MathError::InsufficientData(format!(
            "Need {} values of history for lag features, have {}",
            max_lag,
            history.len()
        )));
    }

    let mut row = Vec::with_capacity(lags.len() + 1);
    row.push(day_index as f64);
    for &lag in lags {
        row.push(history[history.len() - lag]);
    }

    Ok(row)
}
