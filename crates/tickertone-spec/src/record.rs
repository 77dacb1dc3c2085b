//! Daily feature records and the ordered table the engine consumes.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Minimum number of days needed to build a control curve.
pub const MIN_DAYS_FOR_INTERPOLATION: usize = 2;

/// One trading day of preprocessed features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyFeatureRecord {
    /// Smoothed log-price.
    pub trend: f64,
    /// Signed first difference of `trend`.
    pub speed: f64,
    /// Magnitude of `speed` normalized to [0, 1] across the series.
    pub speed_norm: f64,
    /// True when the day's move exceeded the event threshold.
    pub event: bool,
}

impl DailyFeatureRecord {
    /// Creates a new record.
    pub fn new(trend: f64, speed: f64, speed_norm: f64, event: bool) -> Self {
        Self {
            trend,
            speed,
            speed_norm,
            event,
        }
    }

    /// Direction of movement: -1, 0 or +1. NaN counts as no movement.
    pub fn speed_sign(&self) -> f64 {
        if self.speed > 0.0 {
            1.0
        } else if self.speed < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

/// Calendar-ordered sequence of daily feature records.
///
/// The table is immutable once built; column accessors copy into fresh
/// vectors so the mapper can work on plain slices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    records: Vec<DailyFeatureRecord>,
}

impl FeatureTable {
    /// Creates a table from records in calendar order.
    pub fn new(records: Vec<DailyFeatureRecord>) -> Self {
        Self { records }
    }

    /// Returns the records.
    pub fn records(&self) -> &[DailyFeatureRecord] {
        &self.records
    }

    /// Number of days.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table holds no days.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Trend column.
    pub fn trends(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.trend).collect()
    }

    /// Speed column.
    pub fn speeds(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.speed).collect()
    }

    /// Normalized speed column.
    pub fn speed_norms(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.speed_norm).collect()
    }

    /// Speed direction column (-1, 0, +1).
    pub fn speed_signs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.speed_sign()).collect()
    }

    /// Event column.
    pub fn events(&self) -> Vec<bool> {
        self.records.iter().map(|r| r.event).collect()
    }

    /// Checks that the table has enough days to be interpolated.
    pub fn validate_for_render(&self) -> SpecResult<()> {
        if self.records.len() < MIN_DAYS_FOR_INTERPOLATION {
            return Err(SpecError::invalid_input(
                "features",
                format!(
                    "need at least {} days, got {}",
                    MIN_DAYS_FOR_INTERPOLATION,
                    self.records.len()
                ),
            ));
        }
        Ok(())
    }
}

impl From<Vec<DailyFeatureRecord>> for FeatureTable {
    fn from(records: Vec<DailyFeatureRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<DailyFeatureRecord> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = DailyFeatureRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
