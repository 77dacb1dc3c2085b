//! Piecewise-linear control curves over the daily time axis.
//!
//! Daily values are pinned to evenly spaced knots covering the render
//! duration; a [`ContinuousControl`] answers "what is the value at time t"
//! for any t, including times before the first or after the last knot.

use tickertone_spec::{Extrapolation, MIN_DAYS_FOR_INTERPOLATION};

use crate::error::{AudioError, AudioResult};

/// Strictly increasing knot times, one per day, spanning `[0, total_duration]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    knots: Vec<f64>,
}

impl TimeAxis {
    /// Knot times in seconds.
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Number of knots (days).
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    /// Returns true if the axis has no knots.
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Time of the last knot.
    pub fn total_duration(&self) -> f64 {
        self.knots.last().copied().unwrap_or(0.0)
    }
}

/// Spreads `n_days` knots evenly over `[0, total_duration]`.
///
/// `t_i = i * total_duration / (n_days - 1)`, with the last knot pinned to
/// `total_duration` exactly.
///
/// # Errors
/// - [`AudioError::InvalidInput`] if `n_days < 2`
/// - [`AudioError::InvalidDuration`] if the duration is not finite and positive
pub fn build_time_axis(n_days: usize, total_duration: f64) -> AudioResult<TimeAxis> {
    if n_days < MIN_DAYS_FOR_INTERPOLATION {
        return Err(AudioError::invalid_input(
            "n_days",
            format!(
                "need at least {} days to interpolate, got {}",
                MIN_DAYS_FOR_INTERPOLATION, n_days
            ),
        ));
    }
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(AudioError::InvalidDuration {
            duration: total_duration,
        });
    }

    let last = n_days - 1;
    let step = total_duration / last as f64;
    let knots = (0..n_days)
        .map(|i| if i == last { total_duration } else { i as f64 * step })
        .collect();
    Ok(TimeAxis { knots })
}

/// A control value as a function of time.
#[derive(Debug, Clone)]
pub struct ContinuousControl<'a> {
    axis: &'a TimeAxis,
    values: Vec<f64>,
    extrapolation: Extrapolation,
}

/// Pairs `values` with the knots of `axis`.
///
/// # Errors
/// [`AudioError::InvalidInput`] if the value count differs from the knot count.
pub fn interpolate<'a>(
    axis: &'a TimeAxis,
    values: &[f64],
    extrapolation: Extrapolation,
) -> AudioResult<ContinuousControl<'a>> {
    if values.len() != axis.len() {
        return Err(AudioError::invalid_input(
            "values",
            format!(
                "{} values for a time axis of {} knots",
                values.len(),
                axis.len()
            ),
        ));
    }
    Ok(ContinuousControl {
        axis,
        values: values.to_vec(),
        extrapolation,
    })
}

impl ContinuousControl<'_> {
    /// Value at time `t`. Knot times return their daily value exactly.
    ///
    /// A NaN query yields NaN.
    pub fn eval(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }

        let knots = self.axis.knots();
        let last = knots.len() - 1;

        if self.extrapolation == Extrapolation::Clamp {
            if t <= knots[0] {
                return self.values[0];
            }
            if t >= knots[last] {
                return self.values[last];
            }
        }

        // Segment i spans [knots[i], knots[i + 1]]; outside the axis the
        // first or last segment is extended.
        let segment = knots.partition_point(|&k| k <= t).saturating_sub(1).min(last - 1);
        let (t0, t1) = (knots[segment], knots[segment + 1]);
        let (v0, v1) = (self.values[segment], self.values[segment + 1]);

        let frac = (t - t0) / (t1 - t0);
        v0 * (1.0 - frac) + v1 * frac
    }

    /// Evaluates every query time; queries need not be sorted.
    pub fn sample(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|&t| self.eval(t)).collect()
    }

    /// The daily values this curve passes through.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The out-of-range policy.
    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }
}
