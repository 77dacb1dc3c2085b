//! Upstream feature extraction: raw closing prices to daily feature records.
//!
//! The synthesis engine only ever sees the resulting [`FeatureTable`]; this
//! module exists so a raw price export can be turned into one.

use crate::error::{SpecError, SpecResult};
use crate::record::{DailyFeatureRecord, FeatureTable};
use crate::table::{parse_float_cell, DelimitedTable};

/// Default rolling-mean window (trading days).
pub const DEFAULT_TREND_WINDOW: usize = 11;

/// Default event threshold on `|speed|` (log-price units per day).
pub const DEFAULT_EVENT_LIMIT: f64 = 0.10;

/// Normalization ranges narrower than this are treated as flat.
pub const FLAT_RANGE_EPSILON: f64 = 1e-9;

/// Extracts one price column from comma-separated text.
///
/// Rows whose cell is empty or NaN are dropped, keeping calendar order.
///
/// # Errors
/// - [`SpecError::MissingColumn`] if `column` is not in the header
/// - [`SpecError::Parse`] if a non-empty cell is not a number
pub fn load_price_column(text: &str, column: &str) -> SpecResult<Vec<f64>> {
    let table = DelimitedTable::parse(text)?;
    let index = table.column_index(column)?;

    let mut prices = Vec::with_capacity(table.row_count());
    let mut dropped = 0usize;
    for (line, cell) in table.column_cells(index) {
        match parse_float_cell(line, column, cell)? {
            Some(v) if !v.is_nan() => prices.push(v),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::warn!(column, dropped, "dropped rows with missing prices");
    }
    Ok(prices)
}

/// Centered rolling mean with a minimum of one observation per window.
///
/// For an even window the extra sample is taken from the left, so index `i`
/// averages `[i - window/2, i + (window - 1 - window/2)]` clipped to the series.
pub fn centered_rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.is_empty() {
        return values.to_vec();
    }
    let left = window / 2;
    let right = window - 1 - left;
    let last = values.len() - 1;

    (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(left);
            let hi = (i + right).min(last);
            let slice = &values[lo..=hi];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Min-max normalizes into [0, 1]; a flat series maps to all zeros.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if !range.is_finite() || range < FLAT_RANGE_EPSILON {
        return vec![0.0; values.len()];
    }
    values.iter().map(|&v| (v - min) / range).collect()
}

/// Builds the daily feature table from closing prices.
///
/// - `trend`: centered rolling mean of `ln(price)`
/// - `speed`: first difference of trend, 0 on the first day
/// - `speed_norm`: min-max normalized speed
/// - `event`: `|speed| > event_limit`
///
/// # Errors
/// [`SpecError::InvalidInput`] for an empty series, a zero window, or a
/// non-positive / non-finite price.
pub fn prepare_features(prices: &[f64], window: usize, event_limit: f64) -> SpecResult<FeatureTable> {
    if prices.is_empty() {
        return Err(SpecError::invalid_input("prices", "series is empty"));
    }
    if window == 0 {
        return Err(SpecError::invalid_input("window", "must be >= 1"));
    }
    if let Some((i, p)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p <= 0.0)
    {
        return Err(SpecError::invalid_input(
            "prices",
            format!("price at row {} must be positive and finite, got {}", i, p),
        ));
    }

    let log_prices: Vec<f64> = prices.iter().map(|p| p.ln()).collect();
    let trend = centered_rolling_mean(&log_prices, window);

    let speed: Vec<f64> = std::iter::once(0.0)
        .chain(trend.windows(2).map(|w| w[1] - w[0]))
        .collect();
    let speed_norm = min_max_normalize(&speed);

    let records: FeatureTable = trend
        .iter()
        .zip(&speed)
        .zip(&speed_norm)
        .map(|((&t, &s), &n)| DailyFeatureRecord::new(t, s, n, s.abs() > event_limit))
        .collect();

    tracing::debug!(
        days = records.len(),
        events = records.events().iter().filter(|&&e| e).count(),
        window,
        "prepared daily features"
    );
    Ok(records)
}
