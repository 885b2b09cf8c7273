//! Utility functions for the channel_forecast crate

use crate::data::Rounding;
use chrono::{Days, NaiveDate};

/// Calendar days following `last_date`: `last_date + 1, ..., last_date + horizon`
pub fn future_dates(last_date: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon as u64)
        .map_while(|offset| last_date.checked_add_days(Days::new(offset)))
        .collect()
}

/// Floor at zero. NaN and negative zero both become `0.0`.
pub fn clamp_non_negative(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Round half to even at the precision of `rounding`.
pub fn round_value(value: f64, rounding: Rounding) -> f64 {
    match rounding {
        Rounding::Integer => value.round_ties_even(),
        Rounding::Cents => (value * 100.0).round_ties_even() / 100.0,
    }
}
